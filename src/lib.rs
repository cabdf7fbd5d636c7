//! Startup configuration resolution for the ctgate metrics gateway.
//!
//! ctgate sits between Prometheus remote-write senders and an upstream
//! store, stamping and routing series per tenant. This crate resolves
//! everything its subsystems need at startup: an optional YAML file,
//! overridden by `CT_*` environment variables, completed with documented
//! defaults, then checked against cross-field invariants. Resolution runs
//! exactly once, before any listener binds, and the result is immutable.
//!
//! ```no_run
//! # fn main() -> Result<(), ctgate_config::ConfigError> {
//! let config = ctgate_config::load(None)?;
//! println!("forwarding to {}", config.target.endpoint);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod observability;

pub use config::loader::{load, ConfigError, Loader, SkipVerifyPolicy};
pub use config::schema::Config;
