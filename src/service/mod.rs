//! Business rules over the store traits.

mod account;
mod message;
pub mod validation;
pub use account::AccountService;
pub use message::{MessageService, UpdateOutcome};
