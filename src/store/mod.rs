//! Persistence collaborator: account and message collections keyed by integer id.
//!
//! The rule layer only sees these traits; `PgStore` backs them with PostgreSQL and
//! `MemoryStore` with an in-process map for tests and local runs.

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::{ensure_database_exists, ensure_schema, PgStore};

use crate::error::AppError;
use crate::model::{Account, AccountDraft, Message, MessageDraft};
use async_trait::async_trait;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;

    /// Exact match on both fields.
    async fn find_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError>;

    async fn find_by_account_id(&self, account_id: i32) -> Result<Option<Account>, AppError>;

    /// Insert and return the stored row with its generated id.
    /// A duplicate username is reported as `AppError::Conflict`.
    async fn save(&self, draft: AccountDraft) -> Result<Account, AppError>;

    /// Readiness check.
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert and return the stored row with its generated id.
    async fn save(&self, draft: MessageDraft) -> Result<Message, AppError>;

    /// Overwrite the text of an existing row. Returns false if no row has that id.
    async fn update_text(&self, message_id: i32, message_text: &str) -> Result<bool, AppError>;

    async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError>;

    async fn exists_by_id(&self, message_id: i32) -> Result<bool, AppError>;

    /// Returns the number of rows removed (0 or 1).
    async fn delete_by_id(&self, message_id: i32) -> Result<u64, AppError>;

    async fn find_by_posted_by(&self, account_id: i32) -> Result<Vec<Message>, AppError>;

    /// All rows in id order.
    async fn find_all(&self) -> Result<Vec<Message>, AppError>;
}
