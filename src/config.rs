use crate::error::RelayError;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use url::Url;

/// What to do with a record accepted from a remote peer.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundPolicy {
    /// Store the record exactly as the sender formatted it.
    Verbatim,
    /// Re-run the record through this node's own formatter (relay tagging).
    Retag,
}

/// Immutable-after-startup configuration. Constructed once in `app::main`
/// and passed explicitly to each component.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Node-local log relay", long_about = None)]
pub struct Config {
    /// Accept records from peers over HTTP
    #[arg(long, env = "LOGFERRY_LISTEN")]
    pub listen: bool,

    /// Listener bind host
    #[arg(long, env = "LOGFERRY_LISTEN_HOST", default_value = "localhost")]
    pub listen_host: String,

    /// Listener bind port
    #[arg(long, env = "LOGFERRY_LISTEN_PORT", default_value_t = 22016)]
    pub listen_port: u16,

    /// Forward records to a peer instead of writing them locally
    #[arg(long, env = "LOGFERRY_SEND")]
    pub send: bool,

    /// Peer host to forward to
    #[arg(long, env = "LOGFERRY_SEND_HOST", default_value = "localhost")]
    pub send_host: String,

    /// Peer port to forward to
    #[arg(long, env = "LOGFERRY_SEND_PORT", default_value_t = 22016)]
    pub send_port: u16,

    /// Prefix each record with a UTC timestamp (suppressed while forwarding)
    #[arg(long, env = "LOGFERRY_TIMESTAMP", default_value_t = true, action = ArgAction::Set)]
    pub timestamp: bool,

    /// Node name prepended to each record; empty disables tagging
    #[arg(long, env = "LOGFERRY_NAME", default_value = "")]
    pub name: String,

    /// Local log file path (used when not forwarding)
    #[arg(long, env = "LOGFERRY_LOGFILE", default_value = "./logferry.log")]
    pub logfile: PathBuf,

    /// Log retention period in hours (accepted, not applied)
    #[arg(long, env = "LOGFERRY_PERIOD_HOURS", default_value_t = 367_920)]
    pub period_hours: u64,

    /// Delivery queue capacity; producers block once full
    #[arg(long, env = "LOGFERRY_QUEUE_CAPACITY", default_value_t = 10_000)]
    pub queue_capacity: usize,

    /// How to treat records received from peers
    #[arg(long, env = "LOGFERRY_INBOUND", value_enum, default_value = "verbatim")]
    pub inbound: InboundPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self::parse_from(["logferry"])
    }
}

impl Config {
    pub fn from_args<I, T>(args: I) -> Result<Self, RelayError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let config = Self::parse_from(args);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RelayError> {
        if self.queue_capacity == 0 {
            return Err(RelayError::Config("queue capacity cannot be 0".into()));
        }
        if self.listen {
            validate_host(&self.listen_host)?;
            validate_port(self.listen_port)?;
        }
        if self.send {
            validate_host(&self.send_host)?;
            validate_port(self.send_port)?;
        }
        if self.send
            && self.listen
            && self.send_port == self.listen_port
            && is_local(&self.send_host)
            && is_local(&self.listen_host)
        {
            return Err(RelayError::Config(
                "forwarding to the node's own listen address would deadlock the pipeline".into(),
            ));
        }
        Ok(())
    }

    /// Address the inbound listener binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }

    /// Base URL of the peer this node forwards to.
    pub fn peer_endpoint(&self) -> Result<Url, RelayError> {
        let raw = format!("http://{}:{}", self.send_host, self.send_port);
        raw.parse()
            .map_err(|e| RelayError::Config(format!("invalid peer endpoint {raw}: {e}")))
    }
}

fn validate_host(host: &str) -> Result<(), RelayError> {
    if host.trim().is_empty() {
        return Err(RelayError::Config("host cannot be empty".into()));
    }
    Ok(())
}

fn validate_port(port: u16) -> Result<(), RelayError> {
    if port == 0 {
        return Err(RelayError::Config("port cannot be 0".into()));
    }
    Ok(())
}

fn is_local(host: &str) -> bool {
    matches!(host, "localhost" | "127.0.0.1" | "::1" | "0.0.0.0")
}
