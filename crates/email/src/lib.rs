//! Direct-message channel over SMTP.

use {
    async_trait::async_trait,
    lettre::{
        AsyncSmtpTransport, AsyncTransport, Tokio1Executor,
        message::{Message, header::ContentType},
        transport::smtp::authentication::Credentials,
    },
    tracing::debug,
};

use {
    campustrade_channels::{Delivery, Error, NotificationChannel, Result},
    campustrade_common::{NotifyContext, Recipient, keys},
    campustrade_config::SmtpConfig,
};

pub const NAME: &str = "email";

/// Email channel over an async SMTP relay.
///
/// Available only when the relay is configured; a recipient without an email
/// address makes `deliver` decline, never error out of the dispatch loop.
pub struct EmailChannel {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    site_name: String,
}

impl EmailChannel {
    /// Build the channel from SMTP settings.
    ///
    /// An unconfigured `SmtpConfig` yields a channel that reports itself
    /// unavailable rather than an error, mirroring the deployment question
    /// "is there a relay here?" instead of treating absence as a fault.
    pub fn new(cfg: &SmtpConfig, site_name: impl Into<String>) -> Result<Self> {
        let transport = if cfg.is_configured() {
            let creds = Credentials::new(cfg.user.clone(), cfg.password().to_string());
            // Submission port 587 with STARTTLS.
            let relay = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
                .map_err(|e| Error::config(format!("invalid SMTP host {}: {e}", cfg.host)))?;
            Some(relay.credentials(creds).build())
        } else {
            None
        };
        Ok(Self {
            transport,
            from: cfg.from_address().to_string(),
            site_name: site_name.into(),
        })
    }

    fn subject(&self, ctx: &NotifyContext) -> String {
        ctx.get_str(keys::SUBJECT)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Notification from {}", self.site_name))
    }

    fn body(&self, recipient: &Recipient, message: &str, ctx: &NotifyContext) -> String {
        let mut body = format!("Hi {},\n\n{message}\n", recipient.label());
        if let Some(product) = ctx.get_str(keys::PRODUCT) {
            body.push_str(&format!("\nProduct: {product}\n"));
        }
        if let Some(comment) = ctx.get_str(keys::COMMENT) {
            body.push_str(&format!("Comment: {comment}\n"));
        }
        if let Some(rating) = ctx.get(keys::RATING).and_then(|v| v.as_u64()) {
            body.push_str(&format!("Rating: {rating}/5\n"));
        }
        body.push_str(&format!("\n-- {}\n", self.site_name));
        body
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.transport.is_some()
    }

    async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
    ) -> Result<Delivery> {
        let Some(transport) = &self.transport else {
            return Err(Error::config("SMTP relay not configured"));
        };
        let Some(address) = recipient.email.as_deref() else {
            return Err(Error::unavailable(format!(
                "recipient {} has no email address",
                recipient.id
            )));
        };

        let email = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| Error::config(format!("invalid from address {}: {e}", self.from)))?,
            )
            .to(address.parse().map_err(|e| {
                Error::unavailable(format!("recipient {} has an unparsable email address: {e}", recipient.id))
            })?)
            .subject(self.subject(ctx))
            .header(ContentType::TEXT_PLAIN)
            .body(self.body(recipient, message, ctx))
            .map_err(|e| Error::delivery("failed to build email", e))?;

        transport
            .send(email)
            .await
            .map_err(|e| Error::delivery("SMTP send failed", e))?;

        debug!(recipient = %recipient.id, to = address, "email submitted to relay");
        Ok(Delivery::sent())
    }
}
