use super::inflight::InFlight;
use crate::domain::Record;
use crate::error::RelayError;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Receiving half of the delivery queue; owned exclusively by the writer.
pub type Consumer = mpsc::Receiver<Record>;

/// Producer handle over the bounded delivery queue. `submit` counts the
/// record as in-flight before enqueueing it, and blocks while the queue is
/// at capacity — that wait is the backpressure the line source and the
/// inbound transport both inherit.
#[derive(Clone)]
pub struct Producer {
    tx: mpsc::Sender<Record>,
    inflight: Arc<InFlight>,
}

impl Producer {
    pub async fn submit(&self, record: Record) -> Result<(), RelayError> {
        self.inflight.add(1);
        if self.tx.send(record).await.is_err() {
            // Writer is gone; roll the admission back so the count stays
            // consistent with what actually entered the queue.
            self.inflight.done();
            return Err(RelayError::QueueClosed);
        }
        Ok(())
    }
}

/// Create the bounded FIFO connecting producers to the single writer.
pub fn delivery_channel(
    capacity: usize,
    inflight: Arc<InFlight>,
) -> Result<(Producer, Consumer), RelayError> {
    if capacity == 0 {
        return Err(RelayError::Config("queue capacity cannot be 0".into()));
    }
    let (tx, rx) = mpsc::channel(capacity);
    Ok((Producer { tx, inflight }, rx))
}
