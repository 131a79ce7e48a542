use std::collections::HashMap;

use {
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

/// Recognized context keys consumed by individual channels.
///
/// The context itself is an open map; these are merely the keys channels
/// know how to interpret.
pub mod keys {
    /// Notification category tag ("comment", "favorite", "interest", "stock").
    pub const KIND: &str = "kind";
    /// Name of the product the notification is about.
    pub const PRODUCT: &str = "product";
    /// Subject line for channels that carry one (email).
    pub const SUBJECT: &str = "subject";
    /// Comment body text.
    pub const COMMENT: &str = "comment";
    /// Comment rating, 1-5.
    pub const RATING: &str = "rating";
    /// Display name of the user who triggered the event.
    pub const ACTOR: &str = "actor";
}

/// Values carried under [`keys::KIND`].
pub mod kind {
    pub const COMMENT: &str = "comment";
    pub const FAVORITE: &str = "favorite";
    pub const INTEREST: &str = "interest";
    pub const STOCK: &str = "stock";
}

/// Who a notification is delivered to.
///
/// Owned by the user/profile subsystem; the notification core only reads it.
/// Every address field is optional; a channel that needs an absent address
/// declines gracefully instead of erroring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    /// Stable addressable identity (username). Keys bulk-dispatch results.
    pub id: String,
    /// Preferred display name, when the profile has one.
    pub display_name: Option<String>,
    /// Direct-message (email) address.
    pub email: Option<String>,
    /// Deep-link (WhatsApp) number, digits with country code.
    pub whatsapp: Option<String>,
}

impl Recipient {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            email: None,
            whatsapp: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_whatsapp(mut self, number: impl Into<String>) -> Self {
        self.whatsapp = Some(number.into());
        self
    }

    /// Display name when set, otherwise the identity.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// Open key/value payload accompanying a notification.
///
/// Channels pick out the [`keys`] they understand and ignore the rest;
/// no schema is enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyContext {
    #[serde(flatten)]
    entries: HashMap<String, Value>,
}

impl NotifyContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// String value for `key`, when present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
