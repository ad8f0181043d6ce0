//! HTTP handlers for accounts and messages.

pub mod account;
pub mod message;
