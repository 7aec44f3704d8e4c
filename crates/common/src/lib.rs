//! Common utilities shared by the RcodeZero DNS provider crates
//!
//! # Module Organization
//!
//! - [`registry`]: Generic named-component registry used for module tables
//! - [`observability`]: Logging initialization

pub mod observability;
pub mod registry;

pub use observability::{init_tracing, LogFormat};
pub use registry::{Registry, RegistryError};
