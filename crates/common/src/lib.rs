//! Shared domain types used across all campustrade crates.

pub mod types;

pub use types::{NotifyContext, Recipient, keys, kind};
