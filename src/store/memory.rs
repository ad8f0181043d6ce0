//! In-memory store. Both collections share one lock so username checks and inserts are atomic.

use super::{AccountStore, MessageStore};
use crate::error::AppError;
use crate::model::{Account, AccountDraft, Message, MessageDraft};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i32, Account>,
    messages: BTreeMap<i32, Message>,
    next_account_id: i32,
    next_message_id: i32,
}

/// Ids are `SERIAL` (i32) in PostgreSQL; the in-memory sequence stops at the same bound.
fn next_id(counter: &mut i32, table: &'static str) -> Result<i32, AppError> {
    let id = counter
        .checked_add(1)
        .ok_or_else(|| AppError::Conflict(format!("{} id sequence exhausted", table)))?;
    *counter = id;
    Ok(id)
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    pub async fn message_count(&self) -> usize {
        self.tables.read().await.messages.len()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn find_by_username_and_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .find(|a| a.username == username && a.password == password)
            .cloned())
    }

    async fn find_by_account_id(&self, account_id: i32) -> Result<Option<Account>, AppError> {
        Ok(self.tables.read().await.accounts.get(&account_id).cloned())
    }

    async fn save(&self, draft: AccountDraft) -> Result<Account, AppError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.username == draft.username) {
            return Err(AppError::Conflict("username already exists".into()));
        }
        let account_id = next_id(&mut tables.next_account_id, "account")?;
        let account = Account {
            account_id,
            username: draft.username,
            password: draft.password,
        };
        tables.accounts.insert(account.account_id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn save(&self, draft: MessageDraft) -> Result<Message, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&draft.posted_by) {
            return Err(AppError::Validation("postedBy does not reference an account".into()));
        }
        let message_id = next_id(&mut tables.next_message_id, "message")?;
        let message = Message {
            message_id,
            posted_by: draft.posted_by,
            message_text: draft.message_text,
            time_posted_epoch: draft.time_posted_epoch,
        };
        tables.messages.insert(message.message_id, message.clone());
        Ok(message)
    }

    async fn update_text(&self, message_id: i32, message_text: &str) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        match tables.messages.get_mut(&message_id) {
            Some(m) => {
                m.message_text = message_text.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        Ok(self.tables.read().await.messages.get(&message_id).cloned())
    }

    async fn exists_by_id(&self, message_id: i32) -> Result<bool, AppError> {
        Ok(self.tables.read().await.messages.contains_key(&message_id))
    }

    async fn delete_by_id(&self, message_id: i32) -> Result<u64, AppError> {
        let removed = self.tables.write().await.messages.remove(&message_id);
        Ok(u64::from(removed.is_some()))
    }

    async fn find_by_posted_by(&self, account_id: i32) -> Result<Vec<Message>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .values()
            .filter(|m| m.posted_by == account_id)
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Message>, AppError> {
        Ok(self.tables.read().await.messages.values().cloned().collect())
    }
}
