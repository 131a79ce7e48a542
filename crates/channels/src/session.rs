use std::sync::{Arc, Mutex, PoisonError};

use {async_trait::async_trait, serde::Serialize, tracing::debug};

use campustrade_common::{NotifyContext, Recipient, keys, kind};

use crate::{
    Result,
    channel::{Delivery, NotificationChannel},
    error::Error,
};

pub const NAME: &str = "session";

/// Presentation severity for an in-session flash message.
///
/// Purely a display concern; it never decides delivery success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Notice,
}

/// One queued flash message, drained by page rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub body: String,
}

/// Flash queue bound to one active request/session.
///
/// Shared as `Arc<SessionScope>` between the request handler and the
/// in-session channel; interior mutability keeps the channel's `deliver`
/// signature read-only.
#[derive(Debug, Default)]
pub struct SessionScope {
    flashes: Mutex<Vec<Flash>>,
}

impl SessionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, flash: Flash) {
        self.lock().push(flash);
    }

    /// Take every queued flash, leaving the scope empty.
    pub fn drain(&self) -> Vec<Flash> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Flash>> {
        // A panic while holding the lock cannot corrupt a Vec of flashes.
        self.flashes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Transient in-session channel.
///
/// Available only while bound to an active [`SessionScope`]; delivery queues
/// a flash styled by the context's notification kind.
pub struct SessionChannel {
    scope: Option<Arc<SessionScope>>,
}

impl SessionChannel {
    pub fn new(scope: Arc<SessionScope>) -> Self {
        Self { scope: Some(scope) }
    }

    /// A channel with no session binding; reports itself unavailable.
    pub fn unbound() -> Self {
        Self { scope: None }
    }

    fn level_for(ctx: &NotifyContext) -> FlashLevel {
        match ctx.get_str(keys::KIND) {
            Some(kind::COMMENT) => FlashLevel::Success,
            Some(kind::FAVORITE) => FlashLevel::Info,
            _ => FlashLevel::Notice,
        }
    }
}

#[async_trait]
impl NotificationChannel for SessionChannel {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.scope.is_some()
    }

    async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
    ) -> Result<Delivery> {
        let Some(scope) = &self.scope else {
            return Err(Error::unavailable("no active session scope bound"));
        };
        let level = Self::level_for(ctx);
        scope.push(Flash {
            level,
            body: message.to_string(),
        });
        debug!(recipient = %recipient.id, ?level, "flash queued in session");
        Ok(Delivery::sent())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unbound_channel_is_unavailable() {
        let channel = SessionChannel::unbound();
        assert!(!channel.is_available());
        let err = channel
            .deliver(&Recipient::new("seller1"), "hi", &NotifyContext::new())
            .await
            .expect_err("unbound channel declines");
        assert!(matches!(err, Error::Unavailable { .. }));
    }

    #[tokio::test]
    async fn comment_kind_queues_success_flash() {
        let scope = Arc::new(SessionScope::new());
        let channel = SessionChannel::new(Arc::clone(&scope));
        assert!(channel.is_available());

        let ctx = NotifyContext::new().with(keys::KIND, kind::COMMENT);
        channel
            .deliver(&Recipient::new("seller1"), "new comment!", &ctx)
            .await
            .expect("bound channel delivers");

        let flashes = scope.drain();
        assert_eq!(flashes.len(), 1);
        assert_eq!(flashes[0].level, FlashLevel::Success);
        assert_eq!(flashes[0].body, "new comment!");
        assert!(scope.is_empty());
    }

    #[tokio::test]
    async fn favorite_is_info_and_unknown_is_notice() {
        assert_eq!(
            SessionChannel::level_for(&NotifyContext::new().with(keys::KIND, kind::FAVORITE)),
            FlashLevel::Info
        );
        assert_eq!(
            SessionChannel::level_for(&NotifyContext::new().with(keys::KIND, kind::INTEREST)),
            FlashLevel::Notice
        );
        assert_eq!(
            SessionChannel::level_for(&NotifyContext::new()),
            FlashLevel::Notice
        );
    }
}
