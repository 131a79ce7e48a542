use async_trait::async_trait;

use campustrade_common::{NotifyContext, Recipient};

use crate::Result;

/// Outcome of a successful delivery attempt.
///
/// Some channels produce an artifact the caller may want to surface: the
/// deep-link channel hands back the constructed `wa.me` address here instead
/// of mutating the caller's context.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delivery {
    link: Option<String>,
}

impl Delivery {
    /// Confirmed (or assumed-sent) delivery with nothing to hand back.
    pub fn sent() -> Self {
        Self::default()
    }

    /// Delivery that constructed an address for the caller to surface.
    pub fn with_link(link: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
        }
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub(crate) fn into_link(self) -> Option<String> {
        self.link
    }
}

/// Capability contract every delivery backend implements.
///
/// Channels are constructed once and reused across dispatches; they must not
/// retain per-dispatch state beyond one `deliver` call (the in-session
/// channel's scope binding is the sanctioned exception).
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Stable identity. Keys the dispatch report and preference matching.
    fn name(&self) -> &str;

    /// Cheap, side-effect-free availability probe. The manager records a
    /// `false` outcome without calling [`deliver`](Self::deliver) when this
    /// returns false.
    fn is_available(&self) -> bool;

    /// Best-effort delivery. An `Err` never travels past the dispatch loop;
    /// it is logged there and becomes a `false` entry in the report.
    async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
    ) -> Result<Delivery>;
}
