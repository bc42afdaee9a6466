//! Chat HTTP handler.
//!
//! Endpoint:
//! - POST /chat - One user message in, the stored reply out

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use mirrorchat_core::auth::verifier::TokenVerifier;
use mirrorchat_core::chat::repository::MessageRepository;
use mirrorchat_core::profile::repository::ProfileRepository;
use mirrorchat_types::error::ChatError;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for POST /chat. Missing strings deserialize as empty and are
/// rejected by the service.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub app_id: Option<String>,
}

/// Response body shared by both POST endpoints.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

/// POST /chat
pub async fn chat<M, P, V>(
    State(state): State<AppState<M, P, V>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError>
where
    M: MessageRepository + 'static,
    P: ProfileRepository + 'static,
    V: TokenVerifier + 'static,
{
    let service = state
        .conversation
        .as_ref()
        .ok_or(ChatError::NotConfigured)
        .map_err(AppError::chat)?;
    let Json(request) = payload?;
    let app_id = state.app_id(request.app_id.as_deref());

    let reply = service
        .handle_chat(&request.token, &request.message, app_id)
        .await
        .map_err(AppError::chat)?;

    Ok(Json(SuccessResponse {
        success: true,
        message: reply,
    }))
}
