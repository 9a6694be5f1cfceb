use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Counts records admitted to the delivery queue but not yet durably
/// handled. `add` for a record happens-before its enqueue; `done`
/// happens-after the writer's durability step. Process exit is gated on
/// `wait_zero` after input exhaustion.
#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    zero: Notify,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, n: usize) {
        self.count.fetch_add(n, Ordering::AcqRel);
    }

    pub fn done(&self) {
        let prev = self.count.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "done() without matching add()");
        if prev == 1 {
            self.zero.notify_waiters();
        }
    }

    pub fn value(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Resolves once the counter reaches zero. Registers for notification
    /// before re-checking the count, so a concurrent `done` cannot be lost.
    pub async fn wait_zero(&self) {
        loop {
            if self.value() == 0 {
                return;
            }
            let notified = self.zero.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.value() == 0 {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn wait_zero_returns_immediately_when_empty() {
        let inflight = InFlight::new();
        inflight.wait_zero().await;
    }

    #[tokio::test]
    async fn counter_tracks_admitted_minus_completed() {
        let inflight = InFlight::new();
        inflight.add(3);
        assert_eq!(inflight.value(), 3);
        inflight.done();
        inflight.done();
        assert_eq!(inflight.value(), 1);
    }

    #[tokio::test]
    async fn wait_zero_blocks_until_drained() {
        let inflight = Arc::new(InFlight::new());
        inflight.add(2);

        let waiter = {
            let inflight = inflight.clone();
            tokio::spawn(async move { inflight.wait_zero().await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        inflight.done();
        inflight.done();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("wait_zero did not resolve after drain")
            .unwrap();
    }
}
