//! Simulated appointment booking. Never touches the pipeline.

use axum::Json;

use crate::api::types::{MessageResponse, APPOINTMENT_MESSAGE};

/// `POST /api/appointment`: always the premium upsell.
pub async fn book() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: APPOINTMENT_MESSAGE,
    })
}
