/*
 * Responsibility
 * - GET /me: bearer middleware が載せた subject をそのまま返す
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::Subject;

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub subject: String,
}

pub async fn me(Subject(subject): Subject) -> Json<MeResponse> {
    Json(MeResponse { subject })
}
