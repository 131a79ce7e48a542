//! Notification channel system.
//!
//! Each delivery backend (email, WhatsApp deep links, the durable log, the
//! in-session flash queue) implements the [`NotificationChannel`] trait; the
//! [`DispatchManager`] fans one notification out across its channels in
//! priority order and contains per-channel failures, so a broken backend
//! degrades a dispatch instead of aborting it.

pub mod channel;
pub mod error;
pub mod log;
pub mod manager;
pub mod session;

pub use {
    channel::{Delivery, NotificationChannel},
    error::{Error, Result},
    log::LogChannel,
    manager::{DispatchManager, DispatchReport},
    session::{Flash, FlashLevel, SessionChannel, SessionScope},
};
