//! Registration and login handlers.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::{Account, Credentials, NewAccount};
use crate::response::ok;
use crate::state::AppState;
use axum::extract::State;

/// POST /register
#[utoipa::path(
    post,
    path = "/register",
    request_body = NewAccount,
    responses(
        (status = 200, description = "Stored account with generated id", body = Account),
        (status = 400, description = "Blank username or password shorter than 4 characters"),
        (status = 409, description = "Username already exists"),
    ),
    tag = "accounts"
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<NewAccount>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let account = state.accounts.register(body).await?;
    Ok(ok(account))
}

/// POST /login
#[utoipa::path(
    post,
    path = "/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Matching account", body = Account),
        (status = 401, description = "No account with this username and password"),
    ),
    tag = "accounts"
)]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<Credentials>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let account = state
        .accounts
        .authenticate(&body)
        .await?
        .ok_or_else(|| AppError::Unauthorized("login failed".into()))?;
    Ok(ok(account))
}
