//! Observability subsystem.
//!
//! # Design Decisions
//! - The logging level comes from the resolved configuration, not from
//!   RUST_LOG, so file and environment reach it through the same overlay
//!   rules as every other setting
//! - Initialization is fallible and runs after resolution; a bad level
//!   directive is a startup error like any other

pub mod logging;
