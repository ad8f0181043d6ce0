//! Account rules: registration and login.

use super::validation::{check_password, check_username};
use crate::error::AppError;
use crate::model::{Account, AccountDraft, Credentials, NewAccount};
use crate::store::AccountStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Validate and store a new account.
    ///
    /// Fails with `Validation` for a blank username or a password under 4 characters,
    /// and with `Conflict` when the username is taken.
    pub async fn register(&self, candidate: NewAccount) -> Result<Account, AppError> {
        let (username, password) = match (
            check_username(candidate.username.as_deref()),
            check_password(candidate.password.as_deref()),
        ) {
            (Ok(u), Ok(p)) => (u.to_string(), p.to_string()),
            (Err(reason), _) | (_, Err(reason)) => {
                tracing::debug!(reason, "registration rejected");
                return Err(AppError::Validation("registration failed".into()));
            }
        };

        if self.accounts.find_by_username(&username).await?.is_some() {
            tracing::debug!(username = %username, "registration rejected: username taken");
            return Err(AppError::Conflict("username already exists".into()));
        }

        let account = self.accounts.save(AccountDraft { username, password }).await?;
        tracing::info!(account_id = account.account_id, "account registered");
        Ok(account)
    }

    /// Exact username and password match. `None` covers both unknown user and wrong password.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<Option<Account>, AppError> {
        let (Some(username), Some(password)) = (credentials.username.as_deref(), credentials.password.as_deref())
        else {
            return Ok(None);
        };
        self.accounts.find_by_username_and_password(username, password).await
    }
}
