//! Social media API: account registration/login and message CRUD over PostgreSQL.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod state;
pub mod store;
pub mod telemetry;

pub use error::{AppError, ConfigError};
pub use model::{Account, Credentials, Message, MessageTextUpdate, NewAccount, NewMessage};
pub use routes::{api_routes, app, common_routes};
pub use service::{AccountService, MessageService, UpdateOutcome};
pub use settings::{Settings, StoreKind};
pub use telemetry::init_tracing;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, AccountStore, MemoryStore, MessageStore, PgStore};
