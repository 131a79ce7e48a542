//! Use-case layer translating marketplace events into notification dispatch.
//!
//! Domain handlers (comment creation, favorites, product pages) hand an event
//! and an optional session scope to [`NotificationService`]; the service
//! builds the message and context, resolves a manager, and dispatches.
//! Dispatch outcomes are advisory: a delivery failure never fails the
//! caller's primary transaction.

pub mod events;
pub mod factory;
pub mod service;

pub use {
    events::{CommentEvent, FavoriteEvent, InterestEvent, LowStockEvent},
    factory::{default_manager, single_channel_manager},
    service::NotificationService,
};
