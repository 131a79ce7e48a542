use std::error::Error as StdError;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed errors shared across the channel contract.
///
/// Anything a channel returns from `deliver` is contained at the dispatch
/// loop and becomes a `false` report entry; only construction-time errors
/// (`Config`, `InvalidChannel`, `UnknownChannel`) surface to callers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The channel cannot serve this recipient right now (missing address,
    /// no bound session scope). Not a fault, just a decline.
    #[error("channel unavailable: {message}")]
    Unavailable { message: String },

    /// The channel or a factory was asked to do something its configuration
    /// does not support.
    #[error("channel misconfigured: {message}")]
    Config { message: String },

    /// A factory was asked for a channel name that does not exist.
    #[error("unknown channel: {name}")]
    UnknownChannel { name: String },

    /// A channel registered with a manager violates the channel contract.
    #[error("invalid channel registration: {message}")]
    InvalidChannel { message: String },

    /// Wrapped failure from an external delivery backend.
    #[error("delivery failed: {context}: {source}")]
    Delivery {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn config(message: impl std::fmt::Display) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unknown_channel(name: impl std::fmt::Display) -> Self {
        Self::UnknownChannel {
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn invalid_channel(message: impl std::fmt::Display) -> Self {
        Self::InvalidChannel {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn delivery(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Delivery {
            context: context.into(),
            source: Box::new(source),
        }
    }
}
