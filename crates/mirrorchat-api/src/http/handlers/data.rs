//! Data deletion HTTP handler.
//!
//! Endpoint:
//! - POST /delete-data - Remove the caller's messages and profile

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use mirrorchat_core::auth::verifier::TokenVerifier;
use mirrorchat_core::chat::repository::MessageRepository;
use mirrorchat_core::profile::repository::ProfileRepository;
use mirrorchat_types::error::ChatError;

use crate::http::error::AppError;
use crate::http::handlers::chat::SuccessResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub app_id: Option<String>,
}

/// POST /delete-data
pub async fn delete_data<M, P, V>(
    State(state): State<AppState<M, P, V>>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError>
where
    M: MessageRepository + 'static,
    P: ProfileRepository + 'static,
    V: TokenVerifier + 'static,
{
    let service = state
        .deletion
        .as_ref()
        .ok_or(ChatError::NotConfigured)
        .map_err(AppError::delete)?;
    let Json(request) = payload?;
    let app_id = state.app_id(request.app_id.as_deref());

    service
        .handle_delete(&request.token, app_id)
        .await
        .map_err(AppError::delete)?;

    Ok(Json(SuccessResponse {
        success: true,
        message: "Data deleted successfully.".to_string(),
    }))
}
