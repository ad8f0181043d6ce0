//! Shared application state for all routes.

use crate::service::{AccountService, MessageService};
use crate::store::{AccountStore, MemoryStore, MessageStore, PgStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub messages: MessageService,
    /// Pinged by `/ready`.
    pub health: Arc<dyn AccountStore>,
}

impl AppState {
    /// Wire both services to stores that may be the same object.
    pub fn new(accounts: Arc<dyn AccountStore>, messages: Arc<dyn MessageStore>) -> Self {
        Self {
            accounts: AccountService::new(accounts.clone()),
            messages: MessageService::new(messages, accounts.clone()),
            health: accounts,
        }
    }

    pub fn postgres(store: PgStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store)
    }
}
