use super::channel::Consumer;
use super::inflight::InFlight;
use crate::error::RelayError;
use crate::port::RecordSink;
use std::sync::Arc;
use tracing::debug;

/// Sole consumer of the delivery queue. Delivers each record through the
/// configured sink and only then marks it done. A sink error ends the loop
/// with the record still counted as in-flight; the caller escalates to
/// process exit.
pub async fn run(
    mut records: Consumer,
    sink: Arc<dyn RecordSink>,
    inflight: Arc<InFlight>,
) -> Result<(), RelayError> {
    while let Some(record) = records.recv().await {
        sink.deliver(&record).await?;
        inflight.done();
    }
    debug!("delivery queue closed, writer finished");
    Ok(())
}
