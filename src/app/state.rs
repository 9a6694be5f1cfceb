use crate::config::InboundPolicy;
use crate::domain::Formatter;
use crate::pipeline::Producer;
use std::sync::Arc;

/// State handed to the inbound transport: a producer handle onto the shared
/// delivery queue, the node's formatter, and the configured treatment of
/// received records.
#[derive(Clone)]
pub struct SubmitState {
    pub queue: Producer,
    pub formatter: Arc<Formatter>,
    pub policy: InboundPolicy,
}
