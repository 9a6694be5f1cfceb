pub mod router;
pub mod server;
pub mod state;
pub mod tracing;

use ::tracing::{error, info};
use crate::adapter::{FileSink, RemoteSink};
use crate::collector;
use crate::config::Config;
use crate::domain::Formatter;
use crate::error::RelayError;
use crate::pipeline::{self, InFlight};
use crate::port::RecordSink;
use self::state::SubmitState;
use std::process;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;

/// Terminal state of the process, resolved once at startup. A node that is
/// not listening exits when its input is exhausted and the queue has
/// drained; a listening node keeps serving until SIGINT/SIGTERM.
enum RunMode {
    DrainAndExit,
    ServeUntilSignal(JoinHandle<Result<(), RelayError>>),
}

impl RunMode {
    fn name(&self) -> &'static str {
        match self {
            Self::DrainAndExit => "drain-and-exit",
            Self::ServeUntilSignal(_) => "serve-until-signal",
        }
    }
}

// Main entry point for the application
pub async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing::init_tracing();

    let config = match Config::from_args(std::env::args()) {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            process::exit(1);
        }
    };

    // Fail-fast: any pipeline I/O error lands here and terminates the
    // process with a diagnostic.
    if let Err(e) = run(config).await {
        error!("fatal: {e}");
        process::exit(1);
    }
    Ok(())
}

/// Wire the pipeline from configuration and run it to its terminal state.
/// Every component receives its collaborators explicitly; nothing is
/// process-global.
pub async fn run(config: Config) -> Result<(), RelayError> {
    info!(
        listen = config.listen,
        send = config.send,
        node = %config.name,
        "starting logferry v{}",
        crate::VERSION
    );

    let inflight = Arc::new(InFlight::new());
    let (producer, consumer) = pipeline::delivery_channel(config.queue_capacity, inflight.clone())?;

    // A forwarding node leaves timestamping to the node that persists the
    // record, so a relay chain stamps each line exactly once.
    let formatter = Arc::new(Formatter::new(
        config.name.clone(),
        config.timestamp && !config.send,
    ));

    // Startup errors: sink first (file open / peer dial), then listener
    // bind. All fatal before any record is admitted.
    let sink: Arc<dyn RecordSink> = if config.send {
        Arc::new(RemoteSink::connect(&config.peer_endpoint()?).await?)
    } else {
        Arc::new(FileSink::open(&config.logfile).await?)
    };

    let mut writer = tokio::spawn(pipeline::writer::run(consumer, sink, inflight.clone()));

    let shutdown_token = CancellationToken::new();
    let mode = if config.listen {
        let address = config.listen_addr();
        let listener = TcpListener::bind(&address)
            .await
            .map_err(|source| RelayError::Bind { address, source })?;
        let submit_state = SubmitState {
            queue: producer.clone(),
            formatter: formatter.clone(),
            policy: config.inbound,
        };
        RunMode::ServeUntilSignal(tokio::spawn(server::serve(
            listener,
            router::router(submit_state),
            shutdown_token.clone(),
        )))
    } else {
        RunMode::DrainAndExit
    };
    info!(mode = mode.name(), "run mode resolved");

    let mut source = tokio::spawn(collector::stdin::run(
        tokio::io::stdin(),
        producer,
        formatter,
        shutdown_token.clone(),
    ));

    match mode {
        RunMode::DrainAndExit => {
            // Ingest until end of input, watching the writer for delivery
            // failures the whole time.
            tokio::select! {
                res = &mut source => source_verdict(res)?,
                res = &mut writer => {
                    join_flatten(res)?;
                    // Writer finished cleanly: the queue already closed, so
                    // the source is done too. Surface its verdict and exit.
                    source_verdict(source.await)?;
                    inflight.wait_zero().await;
                    info!("input exhausted and queue drained, exiting");
                    return Ok(());
                }
            }

            // Input exhausted; the source's producer is gone, so the queue
            // closes once the writer has drained it.
            tokio::select! {
                () = inflight.wait_zero() => {}
                res = &mut writer => join_flatten(res)?,
            }
            info!("input exhausted and queue drained, exiting");
            Ok(())
        }
        RunMode::ServeUntilSignal(mut server_task) => {
            // End-of-input alone does not stop a listening node; only a
            // shutdown signal (or a delivery failure) does.
            let mut source_active = true;
            loop {
                tokio::select! {
                    res = &mut source, if source_active => {
                        source_active = false;
                        source_verdict(res)?;
                    }
                    res = &mut server_task => {
                        join_flatten(res)?;
                        break;
                    }
                    res = &mut writer => {
                        join_flatten(res)?;
                        // Clean writer exit: listener and source are both
                        // gone already.
                        if source_active {
                            source_verdict(source.await)?;
                        }
                        inflight.wait_zero().await;
                        info!("queue drained after shutdown, exiting");
                        return Ok(());
                    }
                }
            }

            // Listener stopped accepting and `serve` cancelled the shutdown
            // token, so a source still blocked on an open input stream
            // releases it and drops its producer.
            if source_active {
                source_verdict(source.await)?;
            }
            join_flatten(writer.await)?;
            inflight.wait_zero().await;
            info!("queue drained after shutdown, exiting");
            Ok(())
        }
    }
}

/// End-of-input is a normal stop. A closed queue means the writer already
/// failed; its own join handle carries the real diagnostic, so it is not an
/// error here.
fn source_verdict(res: Result<Result<(), RelayError>, JoinError>) -> Result<(), RelayError> {
    match res {
        Ok(Ok(())) | Ok(Err(RelayError::QueueClosed)) => Ok(()),
        Ok(Err(e)) => Err(e),
        Err(e) => Err(RelayError::Task(e.to_string())),
    }
}

fn join_flatten(res: Result<Result<(), RelayError>, JoinError>) -> Result<(), RelayError> {
    match res {
        Ok(result) => result,
        Err(e) => Err(RelayError::Task(e.to_string())),
    }
}
