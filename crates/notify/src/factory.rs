use std::sync::Arc;

use tracing::warn;

use {
    campustrade_channels::{
        DispatchManager, Error, LogChannel, NotificationChannel, Result, SessionChannel,
        SessionScope, log, session,
    },
    campustrade_config::MarketConfig,
    campustrade_email::EmailChannel,
    campustrade_whatsapp::WhatsAppChannel,
};

/// Compose the default channel stack for a deployment.
///
/// Order is priority order:
/// 1. in-session flash, when a scope is bound
/// 2. email, when the relay is configured and not in development mode
/// 3. whatsapp deep links, always
/// 4. the durable log, always last, as the guaranteed fallback
pub fn default_manager(
    cfg: &MarketConfig,
    session: Option<Arc<SessionScope>>,
) -> DispatchManager {
    let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();

    if let Some(scope) = session {
        channels.push(Arc::new(SessionChannel::new(scope)));
    }

    if cfg.smtp.is_configured() && !cfg.development {
        match EmailChannel::new(&cfg.smtp, cfg.site_name.clone()) {
            Ok(email) => channels.push(Arc::new(email)),
            Err(e) => warn!(error = %e, "email channel misconfigured, leaving it out"),
        }
    }

    channels.push(Arc::new(WhatsAppChannel::new()));
    channels.push(Arc::new(LogChannel::new(cfg.site_name.clone())));

    // Channel names are crate constants, so validation cannot fail here;
    // the log-only fallback keeps the signature infallible regardless.
    match DispatchManager::new(channels) {
        Ok(manager) => manager,
        Err(e) => {
            warn!(error = %e, "default channel stack failed validation, falling back to log only");
            DispatchManager::default()
        },
    }
}

/// A manager carrying exactly one named channel.
///
/// Asking for a name this deployment cannot provide is a caller mistake and
/// surfaces immediately, unlike runtime delivery conditions.
pub fn single_channel_manager(
    name: &str,
    cfg: &MarketConfig,
    session: Option<Arc<SessionScope>>,
) -> Result<DispatchManager> {
    let channel: Arc<dyn NotificationChannel> = match name {
        campustrade_email::NAME => {
            if !cfg.smtp.is_configured() {
                return Err(Error::config("SMTP relay not configured"));
            }
            Arc::new(EmailChannel::new(&cfg.smtp, cfg.site_name.clone())?)
        },
        campustrade_whatsapp::NAME => Arc::new(WhatsAppChannel::new()),
        log::NAME => Arc::new(LogChannel::new(cfg.site_name.clone())),
        session::NAME => {
            let scope = session
                .ok_or_else(|| Error::config("session channel requires an active session scope"))?;
            Arc::new(SessionChannel::new(scope))
        },
        other => return Err(Error::unknown_channel(other)),
    };
    DispatchManager::new(vec![channel])
}
