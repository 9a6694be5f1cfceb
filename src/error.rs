use std::path::PathBuf;
use thiserror::Error;

/// Every I/O failure in the pipeline is fatal: errors propagate to
/// `app::run`, are logged once, and the process exits non-zero. There is no
/// retry path and no partial-failure recovery.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to bind listener on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to log file: {0}")]
    FileWrite(#[source] std::io::Error),

    #[error("failed to reach peer at {endpoint}: {source}")]
    Dial {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to forward record to peer: {0}")]
    Forward(#[source] reqwest::Error),

    #[error("peer rejected record: HTTP {status}")]
    PeerStatus { status: u16 },

    #[error("failed to read input stream: {0}")]
    Input(#[source] std::io::Error),

    #[error("delivery queue closed")]
    QueueClosed,

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    #[error("task failed: {0}")]
    Task(String),
}
