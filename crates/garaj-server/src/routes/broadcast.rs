use axum::{extract::State, http::StatusCode, Json};

use crate::broadcast::{BroadcastAck, BroadcastRequest};
use crate::error::AppError;
use crate::state::AppState;

/// POST /api/broadcast: validate, resolve the audience and start delivery
/// in the background. Answers 202 before any message is sent.
pub async fn create_broadcast(
    State(app): State<AppState>,
    Json(body): Json<BroadcastRequest>,
) -> Result<(StatusCode, Json<BroadcastAck>), AppError> {
    let ack = app.broadcaster.submit(body).await?;
    Ok((StatusCode::ACCEPTED, Json(ack)))
}
