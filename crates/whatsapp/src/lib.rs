//! Deep-link channel building `wa.me` addresses.

use {async_trait::async_trait, tracing::info};

use {
    campustrade_channels::{Delivery, Error, NotificationChannel, Result},
    campustrade_common::{NotifyContext, Recipient, keys},
};

pub const NAME: &str = "whatsapp";

/// WhatsApp deep-link channel.
///
/// Builds a `https://wa.me/<number>?text=...` link carrying a prefilled
/// greeting. The notification counts as delivered once the link is
/// constructed; there is no read confirmation. The link travels back to the
/// caller through [`Delivery::with_link`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatsAppChannel;

impl WhatsAppChannel {
    pub fn new() -> Self {
        Self
    }

    fn compose(recipient: &Recipient, message: &str, ctx: &NotifyContext) -> String {
        let mut text = format!("Hi {}! {message}", recipient.label());
        if let Some(product) = ctx.get_str(keys::PRODUCT) {
            text.push_str(&format!(" Product: {product}"));
        }
        text
    }

    /// Percent-encoded deep link for a number and prefilled text.
    pub fn link_for(number: &str, text: &str) -> String {
        format!("https://wa.me/{number}?text={}", urlencoding::encode(text))
    }
}

#[async_trait]
impl NotificationChannel for WhatsAppChannel {
    fn name(&self) -> &str {
        NAME
    }

    /// The channel itself is always usable; whether a given recipient can be
    /// reached is decided per delivery.
    fn is_available(&self) -> bool {
        true
    }

    async fn deliver(
        &self,
        recipient: &Recipient,
        message: &str,
        ctx: &NotifyContext,
    ) -> Result<Delivery> {
        let Some(number) = recipient.whatsapp.as_deref() else {
            return Err(Error::unavailable(format!(
                "recipient {} has no whatsapp number",
                recipient.id
            )));
        };

        let text = Self::compose(recipient, message, ctx);
        let link = Self::link_for(number, &text);
        info!(recipient = %recipient.id, link = %link, "whatsapp link constructed");
        Ok(Delivery::with_link(link))
    }
}
