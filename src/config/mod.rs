//! Configuration resolution subsystem.
//!
//! # Data Flow
//! ```text
//! config file (YAML, strict schema)
//!     → loader.rs (read & strict decode)
//!     → env.rs (CT_* overlay; set variables win)
//!     → loader.rs (defaulting; label list derives from label)
//!     → validation.rs (semantic checks, TLS path stats)
//!     → Config (resolved, immutable)
//!     → shared read-only by every subsystem
//! ```
//!
//! # Design Decisions
//! - Raw document fields are presence-tracked; defaulting is keyed on
//!   absence, never on a type's zero value
//! - Resolution runs once, synchronously, at startup; no reload, no retry
//! - Validation separates semantic checks from syntactic (serde)
//! - The resolved entity carries settings only, no runtime handles

mod env;
pub mod loader;
pub mod schema;
mod validation;

pub use loader::{load, ConfigError, Loader, SkipVerifyPolicy};
pub use schema::Config;
