//! Message handlers. Missing messages are empty 200s, not errors.

use crate::error::AppError;
use crate::extractors::{JsonBody, PathId};
use crate::model::{Message, MessageTextUpdate, NewMessage};
use crate::response::{ok, ok_optional, ok_rows};
use crate::state::AppState;
use axum::extract::State;
use axum::response::IntoResponse;

/// POST /messages
#[utoipa::path(
    post,
    path = "/messages",
    request_body = NewMessage,
    responses(
        (status = 200, description = "Stored message with generated id", body = Message),
        (status = 400, description = "Invalid text or unknown author"),
    ),
    tag = "messages"
)]
pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewMessage>,
) -> Result<impl IntoResponse, AppError> {
    let message = state.messages.create(body).await?;
    Ok(ok(message))
}

/// GET /messages
#[utoipa::path(
    get,
    path = "/messages",
    responses((status = 200, description = "All messages, possibly empty", body = [Message])),
    tag = "messages"
)]
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.messages.list_all().await?))
}

/// GET /messages/{id}
#[utoipa::path(
    get,
    path = "/messages/{id}",
    params(("id" = i32, Path, description = "Message id")),
    responses((status = 200, description = "The message, or an empty body", body = Message)),
    tag = "messages"
)]
pub async fn read(State(state): State<AppState>, PathId(id): PathId) -> Result<impl IntoResponse, AppError> {
    Ok(ok_optional(state.messages.get_by_id(id).await?))
}

/// DELETE /messages/{id}
#[utoipa::path(
    delete,
    path = "/messages/{id}",
    params(("id" = i32, Path, description = "Message id")),
    responses((status = 200, description = "1 if deleted, otherwise an empty body", body = u64)),
    tag = "messages"
)]
pub async fn delete(State(state): State<AppState>, PathId(id): PathId) -> Result<impl IntoResponse, AppError> {
    Ok(ok_rows(state.messages.delete_by_id(id).await?))
}

/// PATCH /messages/{id}
#[utoipa::path(
    patch,
    path = "/messages/{id}",
    params(("id" = i32, Path, description = "Message id")),
    request_body = MessageTextUpdate,
    responses(
        (status = 200, description = "Rows updated (always 1)", body = u64),
        (status = 400, description = "Unknown message or invalid text"),
    ),
    tag = "messages"
)]
pub async fn update(
    State(state): State<AppState>,
    PathId(id): PathId,
    JsonBody(body): JsonBody<MessageTextUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.messages.update_text(id, body.message_text.as_deref()).await?;
    match outcome.rows_affected() {
        0 => Err(AppError::Validation("message update failed".into())),
        rows => Ok(ok(rows)),
    }
}

/// GET /accounts/{id}/messages
#[utoipa::path(
    get,
    path = "/accounts/{id}/messages",
    params(("id" = i32, Path, description = "Author account id")),
    responses((status = 200, description = "Messages by this account, possibly empty", body = [Message])),
    tag = "messages"
)]
pub async fn list_by_account(
    State(state): State<AppState>,
    PathId(id): PathId,
) -> Result<impl IntoResponse, AppError> {
    Ok(ok(state.messages.list_by_author(id).await?))
}
