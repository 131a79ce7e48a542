use std::sync::Arc;

use tracing::debug;

use {
    campustrade_channels::{DispatchManager, DispatchReport, SessionScope, session},
    campustrade_common::{NotifyContext, keys, kind},
    campustrade_config::MarketConfig,
};

use crate::{
    events::{CommentEvent, FavoriteEvent, InterestEvent, LowStockEvent},
    factory::default_manager,
};

/// High-level notification use cases.
///
/// Holds either an injected manager (tests, special deployments) or builds
/// the default one per invocation so each dispatch binds to the caller's
/// session scope. Reports are advisory: no method here can fail the caller's
/// primary transaction.
pub struct NotificationService {
    config: Arc<MarketConfig>,
    manager: Option<Arc<DispatchManager>>,
}

impl NotificationService {
    pub fn new(config: Arc<MarketConfig>) -> Self {
        Self {
            config,
            manager: None,
        }
    }

    /// Use a specific manager for every dispatch instead of the default
    /// per-invocation composition.
    #[must_use]
    pub fn with_manager(mut self, manager: Arc<DispatchManager>) -> Self {
        self.manager = Some(manager);
        self
    }

    fn resolve_manager(&self, session: Option<Arc<SessionScope>>) -> Arc<DispatchManager> {
        match &self.manager {
            Some(manager) => Arc::clone(manager),
            None => Arc::new(default_manager(&self.config, session)),
        }
    }

    /// Tell the product owner about a new comment.
    pub async fn notify_new_comment(
        &self,
        event: &CommentEvent,
        session: Option<Arc<SessionScope>>,
    ) -> DispatchReport {
        let (message, ctx) = comment_payload(event);
        debug!(seller = %event.seller.id, product = %event.product, "dispatching comment notification");
        self.resolve_manager(session)
            .dispatch(&event.seller, &message, &ctx)
            .await
    }

    /// Tell the product owner their product was favorited.
    pub async fn notify_new_favorite(
        &self,
        event: &FavoriteEvent,
        session: Option<Arc<SessionScope>>,
    ) -> DispatchReport {
        let (message, ctx) = favorite_payload(event);
        debug!(seller = %event.seller.id, product = %event.product, "dispatching favorite notification");
        self.resolve_manager(session)
            .dispatch(&event.seller, &message, &ctx)
            .await
    }

    /// Tell the product owner someone is interested. Interest favors
    /// immediacy over durability, so the in-session and deep-link channels
    /// are tried first.
    pub async fn notify_product_interest(
        &self,
        event: &InterestEvent,
        session: Option<Arc<SessionScope>>,
    ) -> DispatchReport {
        let (message, ctx) = interest_payload(event);
        debug!(seller = %event.seller.id, product = %event.product, "dispatching interest notification");
        self.resolve_manager(session)
            .dispatch_preferring(
                &event.seller,
                &message,
                &ctx,
                &[session::NAME, campustrade_whatsapp::NAME],
            )
            .await
    }

    /// Tell the product owner stock is running low. Runs outside any request,
    /// so there is never a session scope; when the named channels are absent
    /// from the manager the preference entries are simply skipped.
    pub async fn notify_low_stock(&self, event: &LowStockEvent) -> DispatchReport {
        let (message, ctx) = low_stock_payload(event);
        debug!(seller = %event.seller.id, product = %event.product, "dispatching low-stock notification");
        self.resolve_manager(None)
            .dispatch_preferring(
                &event.seller,
                &message,
                &ctx,
                &[campustrade_email::NAME, session::NAME],
            )
            .await
    }
}

fn comment_payload(event: &CommentEvent) -> (String, NotifyContext) {
    let message = format!("You have a new comment from {}!", event.commenter);
    let ctx = NotifyContext::new()
        .with(keys::KIND, kind::COMMENT)
        .with(keys::PRODUCT, event.product.clone())
        .with(keys::COMMENT, event.text.clone())
        .with(keys::RATING, event.rating)
        .with(keys::ACTOR, event.commenter.clone())
        .with(keys::SUBJECT, format!("New comment on {}", event.product));
    (message, ctx)
}

fn favorite_payload(event: &FavoriteEvent) -> (String, NotifyContext) {
    let message = format!("{} marked your product as a favorite!", event.user);
    let ctx = NotifyContext::new()
        .with(keys::KIND, kind::FAVORITE)
        .with(keys::PRODUCT, event.product.clone())
        .with(keys::ACTOR, event.user.clone())
        .with(keys::SUBJECT, format!("New favorite on {}", event.product));
    (message, ctx)
}

fn interest_payload(event: &InterestEvent) -> (String, NotifyContext) {
    let message = format!("{} is interested in your product!", event.user);
    let ctx = NotifyContext::new()
        .with(keys::KIND, kind::INTEREST)
        .with(keys::PRODUCT, event.product.clone())
        .with(keys::ACTOR, event.user.clone())
        .with(keys::SUBJECT, format!("Interest in {}", event.product));
    (message, ctx)
}

fn low_stock_payload(event: &LowStockEvent) -> (String, NotifyContext) {
    let message = format!("Your product '{}' is running low.", event.product);
    let ctx = NotifyContext::new()
        .with(keys::KIND, kind::STOCK)
        .with(keys::PRODUCT, event.product.clone())
        .with(keys::SUBJECT, format!("Low stock: {}", event.product));
    (message, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campustrade_common::Recipient;

    fn comment_event() -> CommentEvent {
        CommentEvent {
            seller: Recipient::new("seller1"),
            commenter: "Ana".into(),
            product: "Bike".into(),
            text: "Is it still available?".into(),
            rating: 4,
        }
    }

    #[test]
    fn comment_payload_carries_commenter_and_product() {
        let (message, ctx) = comment_payload(&comment_event());
        assert_eq!(message, "You have a new comment from Ana!");
        assert_eq!(ctx.get_str(keys::KIND), Some(kind::COMMENT));
        assert_eq!(ctx.get_str(keys::PRODUCT), Some("Bike"));
        assert_eq!(ctx.get_str(keys::SUBJECT), Some("New comment on Bike"));
        assert_eq!(ctx.get(keys::RATING).and_then(|v| v.as_u64()), Some(4));
        assert_eq!(ctx.get_str(keys::COMMENT), Some("Is it still available?"));
    }

    #[test]
    fn favorite_payload_is_tagged_favorite() {
        let event = FavoriteEvent {
            seller: Recipient::new("seller1"),
            user: "Luis".into(),
            product: "Desk lamp".into(),
        };
        let (message, ctx) = favorite_payload(&event);
        assert_eq!(message, "Luis marked your product as a favorite!");
        assert_eq!(ctx.get_str(keys::KIND), Some(kind::FAVORITE));
        assert_eq!(ctx.get_str(keys::SUBJECT), Some("New favorite on Desk lamp"));
    }

    #[test]
    fn low_stock_payload_names_product() {
        let event = LowStockEvent {
            seller: Recipient::new("seller1"),
            product: "Calculator".into(),
        };
        let (message, ctx) = low_stock_payload(&event);
        assert_eq!(message, "Your product 'Calculator' is running low.");
        assert_eq!(ctx.get_str(keys::KIND), Some(kind::STOCK));
    }
}
