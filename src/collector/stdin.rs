use crate::domain::Formatter;
use crate::error::RelayError;
use crate::pipeline::Producer;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Line source: read the input stream line by line, format each line, and
/// admit it to the delivery queue. Returns normally on end-of-input — the
/// writer drains whatever is still queued — or when `shutdown` is
/// cancelled, which happens when a listening node stops accepting.
pub async fn run<R>(
    input: R,
    queue: Producer,
    formatter: Arc<Formatter>,
    shutdown: CancellationToken,
) -> Result<(), RelayError>
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    let mut count: u64 = 0;
    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                debug!(lines = count, "shutdown requested, input stream released");
                return Ok(());
            }
            line = lines.next_line() => {
                let Some(line) = line.map_err(RelayError::Input)? else {
                    break;
                };
                queue.submit(formatter.format(&line)).await?;
                count += 1;
            }
        }
    }
    debug!(lines = count, "input stream exhausted");
    Ok(())
}
