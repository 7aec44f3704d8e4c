//! RcodeZero DNS provider module for ACME DNS-01 challenges
//!
//! This crate plugs the RcodeZero ACME DNS backend into the host's DNS
//! provider module system.
//!
//! # Architecture
//!
//! - [`DnsProviderModule`] - Lifecycle contract every provider module implements
//! - [`ModuleRegistry`] - Module table keyed by `dns.providers.<name>`
//! - [`RcodeZeroProvider`] - The RcodeZero module (directives, JSON, provisioning)
//! - [`AcmeDnsConfig`] - Settings handed to the backend
//! - [`adapt`] - Directive file / JSON conversion used by `rcodezero-adapt`
//!
//! # Example
//!
//! ```
//! use rcodezero_config::{Dispenser, Replacer};
//! use rcodezero_dns::{DnsProviderModule, ProvisionContext, RcodeZeroProvider};
//!
//! let mut d = Dispenser::test("rcodezero {\n  api_token {$RCODEZERO_TOKEN}\n}").unwrap();
//! let mut provider = RcodeZeroProvider::new();
//! provider.unmarshal_directives(&mut d).unwrap();
//!
//! let ctx = ProvisionContext::new(Replacer::with_env([("RCODEZERO_TOKEN", "abc123")]));
//! provider.provision(&ctx).unwrap();
//! assert_eq!(provider.config().api_token, "abc123");
//! ```

pub mod adapt;
mod backend;
mod error;
mod module;
mod provider;

pub use backend::{AcmeDnsConfig, DEFAULT_BASE_URL};
pub use error::{ConfigField, ProviderError, ProviderResult};
pub use module::{
    module_id, modules, register_module, DnsProviderModule, ModuleInfo, ModuleRegistry,
    ProvisionContext, DNS_PROVIDERS_NAMESPACE,
};
pub use provider::{RcodeZeroProvider, MODULE_ID};
