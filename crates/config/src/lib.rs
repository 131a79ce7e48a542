//! Deployment configuration for the campustrade notification core.
//!
//! Config is discovered from `campustrade.{toml,yaml,yml,json}` (project-local
//! first, then the user config dir), run through `${ENV_VAR}` substitution,
//! and parsed by extension. Missing or broken files fall back to defaults.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config},
    schema::{MarketConfig, SmtpConfig},
};
