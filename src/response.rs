//! Success response helpers. Bodies are bare JSON values (no envelope); "absent" is an empty 200.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

/// 200 with the value, or 200 with an empty body when there is none.
pub fn ok_optional<T: Serialize>(data: Option<T>) -> Response {
    match data {
        Some(v) => ok(v).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

/// 200 with the row count, or an empty 200 when nothing changed.
pub fn ok_rows(rows: u64) -> Response {
    ok_optional((rows > 0).then_some(rows))
}
