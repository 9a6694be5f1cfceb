use crate::domain::Record;
use crate::error::RelayError;
use std::future::Future;
use std::pin::Pin;

/// Durable destination for records. The writer selects one implementation
/// at startup: a local append-only file, or a remote peer reached over the
/// submit transport.
pub trait RecordSink: Send + Sync {
    /// Deliver one record. Returning `Err` is fatal to the process.
    fn deliver<'a>(
        &'a self,
        record: &'a Record,
    ) -> Pin<Box<dyn Future<Output = Result<(), RelayError>> + Send + 'a>>;
}
