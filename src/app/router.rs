use super::state::SubmitState;
use crate::handler::{health_handler, submit_handler};
use axum::Router;
use axum::routing::{get, post};

/// Build the inbound HTTP router (health + submit).
pub fn router(state: SubmitState) -> Router {
    let v1_health_router = Router::new().route("/v1/health", get(health_handler));

    let v1_submit_router = Router::new()
        .route("/v1/submit", post(submit_handler))
        .with_state(state);

    Router::new()
        .merge(v1_health_router)
        .merge(v1_submit_router)
}
