use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
};

/// Root configuration for the notification core.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Site name used in default email subjects and audit log lines.
    pub site_name: String,
    /// Development mode suppresses the email channel in the default
    /// manager factory so local runs never hit a real SMTP relay.
    pub development: bool,
    pub smtp: SmtpConfig,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            site_name: "CampusTrade".into(),
            development: false,
            smtp: SmtpConfig::default(),
        }
    }
}

/// SMTP relay settings for the direct-message (email) channel.
///
/// An empty host or user means "not configured"; the email channel reports
/// itself unavailable rather than failing at send time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    /// Relay host, e.g. "smtp.university.edu". Empty = not configured.
    pub host: String,
    /// Relay username (usually the sending address).
    pub user: String,
    /// Relay password or app-specific password. Supports `${ENV}` in config
    /// files so secrets stay out of the file itself.
    pub password: Secret<String>,
    /// From address; falls back to `user` when empty.
    pub from: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            user: String::new(),
            password: Secret::new(String::new()),
            from: String::new(),
        }
    }
}

impl SmtpConfig {
    /// Whether enough is present to construct a transport.
    pub fn is_configured(&self) -> bool {
        !self.host.is_empty() && !self.user.is_empty()
    }

    /// From address, defaulting to the relay user.
    pub fn from_address(&self) -> &str {
        if self.from.is_empty() { &self.user } else { &self.from }
    }

    /// Expose the relay password for transport construction.
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }
}
