use crate::app::state::SubmitState;
use crate::config::InboundPolicy;
use crate::domain::{Record, SubmitRequest};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::{debug, error};

/// Handler for POST /v1/submit. The acknowledgement is sent only after the
/// record is in the delivery queue, so a full queue holds the remote
/// caller's request open — backpressure reaches all the way back to the
/// sending node.
pub async fn submit_handler(
    State(state): State<SubmitState>,
    Json(request): Json<SubmitRequest>,
) -> impl IntoResponse {
    debug!(bytes = request.content.len(), "received record from peer");

    let record = match state.policy {
        InboundPolicy::Verbatim => Record::new(request.content),
        InboundPolicy::Retag => state.formatter.format(&request.content),
    };

    match state.queue.submit(record).await {
        Ok(()) => (StatusCode::OK, "OK"),
        Err(e) => {
            error!("failed to enqueue inbound record: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "queue closed")
        }
    }
}
