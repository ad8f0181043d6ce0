//! Request extractors that reject with `AppError` so every failure shares one error body.

mod body;
mod id;
pub use body::JsonBody;
pub use id::PathId;
