//! Message rules: create, read, update text, delete, list.

use super::validation::check_message_text;
use crate::error::AppError;
use crate::model::{Message, MessageDraft, NewMessage};
use crate::store::{AccountStore, MessageStore};
use std::sync::Arc;

/// Result of a text update. Each variant maps to the 0/1 row count clients see.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    NotFound,
    InvalidText,
}

impl UpdateOutcome {
    pub fn rows_affected(self) -> u64 {
        match self {
            UpdateOutcome::Updated => 1,
            UpdateOutcome::NotFound | UpdateOutcome::InvalidText => 0,
        }
    }
}

#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageStore>,
    accounts: Arc<dyn AccountStore>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageStore>, accounts: Arc<dyn AccountStore>) -> Self {
        Self { messages, accounts }
    }

    /// Validate and store a message. Text must be 1..=254 non-blank characters and
    /// `postedBy` must name an existing account.
    pub async fn create(&self, candidate: NewMessage) -> Result<Message, AppError> {
        let text = match check_message_text(candidate.message_text.as_deref()) {
            Ok(t) => t.to_string(),
            Err(reason) => return Err(rejected(reason)),
        };
        let Some(posted_by) = candidate.posted_by else {
            return Err(rejected("postedBy is required"));
        };
        if self.accounts.find_by_account_id(posted_by).await?.is_none() {
            return Err(rejected("postedBy does not reference an account"));
        }

        let draft = MessageDraft {
            posted_by,
            message_text: text,
            time_posted_epoch: candidate
                .time_posted_epoch
                .unwrap_or_else(|| chrono::Utc::now().timestamp()),
        };
        let message = self.messages.save(draft).await.map_err(|e| match e {
            AppError::Validation(reason) => rejected(&reason),
            other => other,
        })?;
        tracing::info!(message_id = message.message_id, posted_by, "message created");
        Ok(message)
    }

    pub async fn list_all(&self) -> Result<Vec<Message>, AppError> {
        self.messages.find_all().await
    }

    pub async fn get_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        self.messages.find_by_id(message_id).await
    }

    /// Returns 1 if the message existed and was removed, 0 otherwise.
    pub async fn delete_by_id(&self, message_id: i32) -> Result<u64, AppError> {
        if !self.messages.exists_by_id(message_id).await? {
            return Ok(0);
        }
        let removed = self.messages.delete_by_id(message_id).await?;
        if removed > 0 {
            tracing::info!(message_id, "message deleted");
        }
        Ok(removed.min(1))
    }

    /// Replace the text of an existing message. The record is untouched unless the
    /// outcome is `Updated`.
    pub async fn update_text(&self, message_id: i32, new_text: Option<&str>) -> Result<UpdateOutcome, AppError> {
        if self.messages.find_by_id(message_id).await?.is_none() {
            return Ok(UpdateOutcome::NotFound);
        }
        let text = match check_message_text(new_text) {
            Ok(t) => t,
            Err(reason) => {
                tracing::debug!(message_id, reason, "message update rejected");
                return Ok(UpdateOutcome::InvalidText);
            }
        };
        // The row can vanish between lookup and write.
        if !self.messages.update_text(message_id, text).await? {
            return Ok(UpdateOutcome::NotFound);
        }
        tracing::info!(message_id, "message updated");
        Ok(UpdateOutcome::Updated)
    }

    pub async fn list_by_author(&self, account_id: i32) -> Result<Vec<Message>, AppError> {
        self.messages.find_by_posted_by(account_id).await
    }
}

fn rejected(reason: &str) -> AppError {
    tracing::debug!(reason, "message creation rejected");
    AppError::Validation("message creation failed".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccountDraft;
    use crate::store::MemoryStore;

    async fn setup() -> (MessageService, MemoryStore, i32) {
        let store = MemoryStore::new();
        let author = AccountStore::save(
            &store,
            AccountDraft {
                username: "bob".into(),
                password: "pass1".into(),
            },
        )
        .await
        .unwrap();
        let svc = MessageService::new(Arc::new(store.clone()), Arc::new(store.clone()));
        (svc, store, author.account_id)
    }

    fn new_message(posted_by: i32, text: &str) -> NewMessage {
        NewMessage {
            posted_by: Some(posted_by),
            message_text: Some(text.into()),
            time_posted_epoch: Some(1669947792),
        }
    }

    #[tokio::test]
    async fn create_accepts_up_to_254_characters() {
        let (svc, _, author) = setup().await;
        let m = svc.create(new_message(author, &"a".repeat(254))).await.unwrap();
        assert!(m.message_id > 0);
        assert_eq!(m.posted_by, author);
        assert_eq!(m.message_text.len(), 254);
        assert_eq!(m.time_posted_epoch, 1669947792);
    }

    #[tokio::test]
    async fn create_rejects_255_characters_and_blank_text() {
        let (svc, store, author) = setup().await;
        for text in ["a".repeat(255), String::new(), "  ".into()] {
            let err = svc.create(new_message(author, &text)).await.unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
        let err = svc
            .create(NewMessage {
                posted_by: Some(author),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn create_rejects_unknown_or_missing_author() {
        let (svc, store, author) = setup().await;
        let err = svc.create(new_message(author + 100, "valid text")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        let err = svc
            .create(NewMessage {
                message_text: Some("valid text".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn create_stamps_time_when_absent() {
        let (svc, _, author) = setup().await;
        let before = chrono::Utc::now().timestamp();
        let m = svc
            .create(NewMessage {
                posted_by: Some(author),
                message_text: Some("now".into()),
                time_posted_epoch: None,
            })
            .await
            .unwrap();
        assert!(m.time_posted_epoch >= before);
    }

    #[tokio::test]
    async fn get_by_id_missing_is_none() {
        let (svc, _, _) = setup().await;
        assert_eq!(svc.get_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn delete_twice_returns_one_then_zero() {
        let (svc, store, author) = setup().await;
        let m = svc.create(new_message(author, "bye")).await.unwrap();
        assert_eq!(svc.delete_by_id(m.message_id).await.unwrap(), 1);
        assert_eq!(svc.delete_by_id(m.message_id).await.unwrap(), 0);
        assert_eq!(store.message_count().await, 0);
    }

    #[tokio::test]
    async fn delete_missing_leaves_store_unchanged() {
        let (svc, store, author) = setup().await;
        svc.create(new_message(author, "keep")).await.unwrap();
        assert_eq!(svc.delete_by_id(12345).await.unwrap(), 0);
        assert_eq!(store.message_count().await, 1);
    }

    #[tokio::test]
    async fn update_with_empty_text_keeps_original() {
        let (svc, _, author) = setup().await;
        let m = svc.create(new_message(author, "original")).await.unwrap();
        let outcome = svc.update_text(m.message_id, Some("")).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::InvalidText);
        assert_eq!(outcome.rows_affected(), 0);
        let stored = svc.get_by_id(m.message_id).await.unwrap().unwrap();
        assert_eq!(stored.message_text, "original");
    }

    #[tokio::test]
    async fn update_rejects_too_long_or_missing_text() {
        let (svc, _, author) = setup().await;
        let m = svc.create(new_message(author, "original")).await.unwrap();
        assert_eq!(
            svc.update_text(m.message_id, Some(&"z".repeat(255))).await.unwrap(),
            UpdateOutcome::InvalidText
        );
        assert_eq!(svc.update_text(m.message_id, None).await.unwrap(), UpdateOutcome::InvalidText);
        assert_eq!(svc.get_by_id(m.message_id).await.unwrap().unwrap().message_text, "original");
    }

    #[tokio::test]
    async fn update_missing_message_is_not_found() {
        let (svc, _, _) = setup().await;
        let outcome = svc.update_text(77, Some("fine text")).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound);
        assert_eq!(outcome.rows_affected(), 0);
    }

    #[tokio::test]
    async fn update_overwrites_only_text() {
        let (svc, _, author) = setup().await;
        let m = svc.create(new_message(author, "original")).await.unwrap();
        let outcome = svc.update_text(m.message_id, Some("edited")).await.unwrap();
        assert_eq!(outcome.rows_affected(), 1);
        let stored = svc.get_by_id(m.message_id).await.unwrap().unwrap();
        assert_eq!(
            stored,
            Message {
                message_text: "edited".into(),
                ..m
            }
        );
    }

    #[tokio::test]
    async fn list_by_author_filters_and_handles_empty() {
        let (svc, store, author) = setup().await;
        let other = AccountStore::save(
            &store,
            AccountDraft {
                username: "alice".into(),
                password: "pass2".into(),
            },
        )
        .await
        .unwrap();
        assert!(svc.list_by_author(author).await.unwrap().is_empty());

        svc.create(new_message(author, "from bob")).await.unwrap();
        svc.create(new_message(other.account_id, "from alice")).await.unwrap();
        svc.create(new_message(author, "bob again")).await.unwrap();

        let bobs: Vec<String> = svc
            .list_by_author(author)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.message_text)
            .collect();
        assert_eq!(bobs, ["from bob", "bob again"]);
        assert_eq!(svc.list_all().await.unwrap().len(), 3);
        assert!(svc.list_by_author(9999).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_empty_store() {
        let (svc, _, _) = setup().await;
        assert!(svc.list_all().await.unwrap().is_empty());
    }
}
