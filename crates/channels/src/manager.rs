use std::{collections::HashMap, fmt, sync::Arc};

use tracing::{debug, info, warn};

use campustrade_common::{NotifyContext, Recipient};

use crate::{
    Result,
    channel::NotificationChannel,
    error::Error,
    log::LogChannel,
};

/// Per-channel outcomes for one dispatch call.
///
/// Every channel the effective order contained gets an entry; duplicate
/// channel names collapse onto one key.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    results: HashMap<String, bool>,
    links: HashMap<String, String>,
}

impl DispatchReport {
    /// Outcome for one channel, `None` when the channel was not attempted.
    pub fn outcome(&self, channel: &str) -> Option<bool> {
        self.results.get(channel).copied()
    }

    /// Whether the named channel reported success.
    pub fn delivered(&self, channel: &str) -> bool {
        self.outcome(channel).unwrap_or(false)
    }

    /// Whether at least one channel reported success.
    pub fn any_delivered(&self) -> bool {
        self.results.values().any(|ok| *ok)
    }

    /// All per-channel outcomes.
    pub fn results(&self) -> &HashMap<String, bool> {
        &self.results
    }

    /// Addresses constructed during delivery (deep links), by channel name.
    pub fn link(&self, channel: &str) -> Option<&str> {
        self.links.get(channel).map(String::as_str)
    }

    pub fn links(&self) -> &HashMap<String, String> {
        &self.links
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Ordered collection of channels plus the dispatch loop.
///
/// Registration order is both the default priority and the audit order. The
/// dispatch loop is the failure-containment boundary: a channel declining or
/// erroring only ever affects its own report entry.
///
/// Dispatch is a read-only traversal and may run concurrently across
/// independent managers. `add_channel`/`remove_channel` take `&mut self`;
/// callers sharing a manager serialize structural changes themselves, or
/// rebuild instead of mutating.
pub struct DispatchManager {
    channels: Vec<Arc<dyn NotificationChannel>>,
}

// Channels are trait objects, so derive is not an option; names are the
// useful part anyway.
impl fmt::Debug for DispatchManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchManager")
            .field("channels", &self.channel_names())
            .finish()
    }
}

impl Default for DispatchManager {
    /// The "fall back to log" configuration: a manager that only records.
    fn default() -> Self {
        Self {
            channels: vec![Arc::new(LogChannel::default())],
        }
    }
}

impl DispatchManager {
    /// Build a manager over an explicit channel list.
    ///
    /// The one contract rule the type system cannot enforce is checked here,
    /// once, instead of on every dispatch: a channel must expose a usable
    /// identity.
    pub fn new(channels: Vec<Arc<dyn NotificationChannel>>) -> Result<Self> {
        for channel in &channels {
            if channel.name().trim().is_empty() {
                return Err(Error::invalid_channel("channel has an empty name"));
            }
        }
        Ok(Self { channels })
    }

    /// Names of every owned channel, in registration order.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Names of the channels currently reporting themselves available.
    pub fn available_channels(&self) -> Vec<&str> {
        self.channels
            .iter()
            .filter(|c| c.is_available())
            .map(|c| c.name())
            .collect()
    }

    /// Append a channel unless one with the same name is already registered.
    pub fn add_channel(&mut self, channel: Arc<dyn NotificationChannel>) {
        let name = channel.name();
        if name.trim().is_empty() {
            warn!("refusing to add channel with an empty name");
            return;
        }
        if self.channels.iter().any(|c| c.name() == name) {
            debug!(channel = name, "channel already registered");
            return;
        }
        info!(channel = name, "channel added");
        self.channels.push(channel);
    }

    /// Drop every channel with this name. Unknown names are a no-op.
    pub fn remove_channel(&mut self, name: &str) {
        let before = self.channels.len();
        self.channels.retain(|c| c.name() != name);
        if self.channels.len() != before {
            info!(channel = name, "channel removed");
        }
    }

    /// Deliver through every channel in registration order.
    pub async fn dispatch(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
    ) -> DispatchReport {
        self.run(recipient, message, ctx, &[]).await
    }

    /// Deliver with a preference reordering.
    ///
    /// Preferred names are tried first, in the given order; names that match
    /// no owned channel are skipped silently; every remaining channel is then
    /// appended in registration order, so preferences reorder but never drop.
    pub async fn dispatch_preferring(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
        preferred: &[&str],
    ) -> DispatchReport {
        self.run(recipient, message, ctx, preferred).await
    }

    /// Independent dispatch per recipient, keyed by recipient id.
    ///
    /// No atomicity across recipients; one recipient's outcome never affects
    /// another's.
    pub async fn dispatch_bulk(
        &self,
        recipients: &[Recipient],
        message: &str,
        ctx: &NotifyContext,
    ) -> HashMap<String, DispatchReport> {
        let mut results = HashMap::with_capacity(recipients.len());
        for recipient in recipients {
            let report = self.dispatch(recipient, message, ctx).await;
            results.insert(recipient.id.clone(), report);
        }
        results
    }

    fn effective_order(&self, preferred: &[&str]) -> Vec<&Arc<dyn NotificationChannel>> {
        if preferred.is_empty() {
            return self.channels.iter().collect();
        }

        let mut picked = vec![false; self.channels.len()];
        let mut order = Vec::with_capacity(self.channels.len());
        for name in preferred {
            let next = self
                .channels
                .iter()
                .enumerate()
                .find(|(i, c)| !picked[*i] && c.name() == *name);
            if let Some((i, channel)) = next {
                picked[i] = true;
                order.push(channel);
            }
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if !picked[i] {
                order.push(channel);
            }
        }
        order
    }

    async fn run(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
        preferred: &[&str],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        for channel in self.effective_order(preferred) {
            let name = channel.name();
            if !channel.is_available() {
                debug!(channel = name, recipient = %recipient.id, "channel unavailable, skipping");
                report.results.insert(name.to_string(), false);
                continue;
            }
            match channel.deliver(recipient, message, ctx).await {
                Ok(delivery) => {
                    info!(channel = name, recipient = %recipient.id, "notification delivered");
                    report.results.insert(name.to_string(), true);
                    if let Some(link) = delivery.into_link() {
                        report.links.insert(name.to_string(), link);
                    }
                },
                Err(e) => {
                    warn!(channel = name, recipient = %recipient.id, error = %e, "notification delivery failed");
                    report.results.insert(name.to_string(), false);
                },
            }
        }

        report
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use {async_trait::async_trait, crate::channel::Delivery};

    /// Records invocations so tests can assert call counts and order.
    struct SpyChannel {
        name: &'static str,
        available: bool,
        succeed: bool,
        calls: AtomicUsize,
        trace: Arc<Mutex<Vec<&'static str>>>,
    }

    impl SpyChannel {
        fn shared(
            name: &'static str,
            available: bool,
            succeed: bool,
            trace: Arc<Mutex<Vec<&'static str>>>,
        ) -> Arc<Self> {
            Arc::new(Self {
                name,
                available,
                succeed,
                calls: AtomicUsize::new(0),
                trace,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NotificationChannel for SpyChannel {
        fn name(&self) -> &str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn deliver(
            &self,
            _recipient: &Recipient,
            _message: &str,
            _ctx: &NotifyContext,
        ) -> Result<Delivery> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.trace.lock().expect("trace lock").push(self.name);
            if self.succeed {
                Ok(Delivery::sent())
            } else {
                Err(Error::delivery(
                    "backend exploded",
                    std::io::Error::other("boom"),
                ))
            }
        }
    }

    fn manager_with(channels: Vec<Arc<dyn NotificationChannel>>) -> DispatchManager {
        DispatchManager::new(channels).expect("valid channels")
    }

    #[tokio::test]
    async fn report_covers_every_channel() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let a = SpyChannel::shared("a", true, true, Arc::clone(&trace));
        let b = SpyChannel::shared("b", true, false, Arc::clone(&trace));
        let manager = manager_with(vec![a, b]);

        let report = manager
            .dispatch(&Recipient::new("r"), "msg", &NotifyContext::new())
            .await;
        assert_eq!(report.len(), 2);
        assert_eq!(report.outcome("a"), Some(true));
        assert_eq!(report.outcome("b"), Some(false));
    }

    #[tokio::test]
    async fn unavailable_channel_is_never_invoked() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let down = SpyChannel::shared("down", false, true, Arc::clone(&trace));
        let up = SpyChannel::shared("up", true, true, Arc::clone(&trace));
        let manager = manager_with(vec![Arc::clone(&down) as _, Arc::clone(&up) as _]);

        let report = manager
            .dispatch(&Recipient::new("r"), "msg", &NotifyContext::new())
            .await;
        assert_eq!(down.calls(), 0);
        assert_eq!(up.calls(), 1);
        assert_eq!(report.outcome("down"), Some(false));
        assert_eq!(report.outcome("up"), Some(true));
    }

    #[tokio::test]
    async fn failing_channel_does_not_block_siblings() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let bad = SpyChannel::shared("bad", true, false, Arc::clone(&trace));
        let good = SpyChannel::shared("good", true, true, Arc::clone(&trace));
        let manager = manager_with(vec![Arc::clone(&bad) as _, Arc::clone(&good) as _]);

        let report = manager
            .dispatch(&Recipient::new("r"), "msg", &NotifyContext::new())
            .await;
        assert!(!report.delivered("bad"));
        assert!(report.delivered("good"));
        assert!(report.any_delivered());
        assert_eq!(good.calls(), 1);
    }

    #[tokio::test]
    async fn preference_reorders_without_dropping() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let a = SpyChannel::shared("a", true, true, Arc::clone(&trace));
        let b = SpyChannel::shared("b", true, true, Arc::clone(&trace));
        let c = SpyChannel::shared("c", true, true, Arc::clone(&trace));
        let manager = manager_with(vec![a, b, c]);

        let report = manager
            .dispatch_preferring(&Recipient::new("r"), "msg", &NotifyContext::new(), &["b", "a"])
            .await;
        assert_eq!(report.len(), 3);
        assert_eq!(*trace.lock().expect("trace lock"), vec!["b", "a", "c"]);
    }

    #[tokio::test]
    async fn preference_permutations_yield_same_key_set() {
        for preferred in [["a", "b"], ["b", "a"]] {
            let trace = Arc::new(Mutex::new(Vec::new()));
            let manager = manager_with(vec![
                SpyChannel::shared("a", true, true, Arc::clone(&trace)) as _,
                SpyChannel::shared("b", true, true, Arc::clone(&trace)) as _,
                SpyChannel::shared("c", true, true, Arc::clone(&trace)) as _,
            ]);
            let report = manager
                .dispatch_preferring(
                    &Recipient::new("r"),
                    "msg",
                    &NotifyContext::new(),
                    &preferred,
                )
                .await;
            let mut names: Vec<&str> = report.results().keys().map(String::as_str).collect();
            names.sort_unstable();
            assert_eq!(names, vec!["a", "b", "c"]);
        }
    }

    #[tokio::test]
    async fn unknown_preferred_names_are_ignored() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let a = SpyChannel::shared("a", true, true, Arc::clone(&trace));
        let manager = manager_with(vec![a]);

        let report = manager
            .dispatch_preferring(&Recipient::new("r"), "msg", &NotifyContext::new(), &["ghost"])
            .await;
        assert_eq!(report.len(), 1);
        assert_eq!(report.outcome("a"), Some(true));
    }

    #[tokio::test]
    async fn empty_manager_dispatches_to_nothing() {
        let manager = manager_with(Vec::new());
        let report = manager
            .dispatch(&Recipient::new("r"), "msg", &NotifyContext::new())
            .await;
        assert!(report.is_empty());
        assert!(!report.any_delivered());
    }

    #[tokio::test]
    async fn bulk_dispatch_is_per_recipient() {
        let manager = DispatchManager::default();
        let recipients = [Recipient::new("r1"), Recipient::new("r2")];
        let results = manager
            .dispatch_bulk(&recipients, "msg", &NotifyContext::new())
            .await;
        assert_eq!(results.len(), 2);
        assert!(results["r1"].delivered(crate::log::NAME));
        assert!(results["r2"].delivered(crate::log::NAME));
    }

    #[test]
    fn add_channel_is_idempotent_by_name() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let mut manager = manager_with(Vec::new());
        manager.add_channel(SpyChannel::shared("a", true, true, Arc::clone(&trace)));
        manager.add_channel(SpyChannel::shared("a", true, true, Arc::clone(&trace)));
        manager.add_channel(SpyChannel::shared("b", true, true, Arc::clone(&trace)));
        assert_eq!(manager.channel_names(), vec!["a", "b"]);
    }

    #[test]
    fn remove_channel_tolerates_unknown_names() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let mut manager =
            manager_with(vec![SpyChannel::shared("a", true, true, Arc::clone(&trace)) as _]);
        manager.remove_channel("ghost");
        assert_eq!(manager.channel_names(), vec!["a"]);
        manager.remove_channel("a");
        assert!(manager.channel_names().is_empty());
    }

    #[test]
    fn available_channels_filters_by_probe() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let manager = manager_with(vec![
            SpyChannel::shared("up", true, true, Arc::clone(&trace)) as _,
            SpyChannel::shared("down", false, true, Arc::clone(&trace)) as _,
        ]);
        assert_eq!(manager.available_channels(), vec!["up"]);
    }

    #[test]
    fn empty_channel_name_is_rejected_at_construction() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let err = DispatchManager::new(vec![SpyChannel::shared("", true, true, trace) as _])
            .expect_err("empty name rejected");
        assert!(matches!(err, Error::InvalidChannel { .. }));
    }

    #[test]
    fn debug_output_lists_channel_names() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let manager = manager_with(vec![
            SpyChannel::shared("a", true, true, Arc::clone(&trace)) as _,
            SpyChannel::shared("b", true, true, Arc::clone(&trace)) as _,
        ]);
        let rendered = format!("{manager:?}");
        assert!(rendered.contains("DispatchManager"));
        assert!(rendered.contains("\"a\""));
        assert!(rendered.contains("\"b\""));
    }

    #[test]
    fn default_manager_is_log_only() {
        let manager = DispatchManager::default();
        assert_eq!(manager.channel_names(), vec![crate::log::NAME]);
    }
}
