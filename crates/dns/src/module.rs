//! DNS provider module contract and registration
//!
//! Every provider module is registered under an ID in the
//! `dns.providers` namespace. The host instantiates a module by ID, fills
//! it from directives or JSON, provisions it once, and then hands the
//! resulting configuration to the DNS backend.

use std::fmt::Debug;
use std::sync::{Arc, OnceLock};

use rcodezero_common::Registry;
use rcodezero_config::{Dispenser, Replacer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ProviderError, ProviderResult};
use crate::provider::RcodeZeroProvider;

/// Namespace all DNS provider module IDs live under
pub const DNS_PROVIDERS_NAMESPACE: &str = "dns.providers";

/// Full module ID for a provider directive name
pub fn module_id(name: &str) -> String {
    format!("{}.{}", DNS_PROVIDERS_NAMESPACE, name)
}

/// Registration record for a module
#[derive(Debug, Clone, Copy)]
pub struct ModuleInfo {
    /// Fully qualified ID, e.g. `dns.providers.rcodezero`
    pub id: &'static str,
    /// Constructor returning a fresh, unconfigured instance
    pub new: fn() -> Box<dyn DnsProviderModule>,
}

impl ModuleInfo {
    /// Last label of the ID, used as the directive and JSON `name`
    pub fn name(&self) -> &'static str {
        self.id.rsplit('.').next().unwrap_or(self.id)
    }

    pub fn instantiate(&self) -> Box<dyn DnsProviderModule> {
        (self.new)()
    }
}

/// Host facilities available while provisioning
#[derive(Debug, Clone, Default)]
pub struct ProvisionContext {
    replacer: Replacer,
}

impl ProvisionContext {
    pub fn new(replacer: Replacer) -> Self {
        Self { replacer }
    }

    pub fn replacer(&self) -> &Replacer {
        &self.replacer
    }
}

/// Lifecycle contract of a DNS provider module
pub trait DnsProviderModule: Debug + Send + Sync {
    /// Registration record of this module
    fn module_info(&self) -> ModuleInfo;

    /// Populate the module from directive tokens
    fn unmarshal_directives(&mut self, d: &mut Dispenser) -> ProviderResult<()>;

    /// Populate the module from its JSON configuration (without `name`)
    fn load_json(&mut self, config: Value) -> ProviderResult<()>;

    /// Expand placeholders and validate; runs once before use
    fn provision(&mut self, ctx: &ProvisionContext) -> ProviderResult<()>;

    /// JSON configuration of the module, including its `name`
    fn to_json(&self) -> Value;
}

/// Table of known DNS provider modules
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: Registry<ModuleInfo>,
}

impl ModuleRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the modules shipped with this crate
    pub fn with_builtin_modules() -> Self {
        let registry = Self::new();
        for info in [RcodeZeroProvider::MODULE_INFO] {
            if let Err(e) = registry.register(info) {
                warn!(module = info.id, error = %e, "Failed to register builtin module");
            }
        }
        registry
    }

    /// Register a module; IDs must be unique
    pub fn register(&self, info: ModuleInfo) -> ProviderResult<()> {
        self.modules.try_insert(info.id, Arc::new(info))?;
        debug!(module = info.id, "Registered module");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<ModuleInfo> {
        self.modules.get(id).map(|info| *info)
    }

    /// Registered module IDs, sorted
    pub fn ids(&self) -> Vec<String> {
        self.modules.keys()
    }

    /// Fresh instance of the module registered under `id`
    pub fn instantiate(&self, id: &str) -> ProviderResult<Box<dyn DnsProviderModule>> {
        let info = self.get(id).ok_or_else(|| ProviderError::UnknownModule {
            id: id.to_string(),
        })?;
        Ok(info.instantiate())
    }

    /// Instantiate and configure a module from one directive segment
    ///
    /// The first token of the segment names the provider, e.g. `rcodezero`
    /// selects `dns.providers.rcodezero`.
    pub fn unmarshal_segment(
        &self,
        d: &mut Dispenser,
    ) -> ProviderResult<Box<dyn DnsProviderModule>> {
        d.reset();
        if !d.next() {
            return Err(d.err("expected a DNS provider directive").into());
        }
        let id = module_id(d.val());
        let mut module = self.instantiate(&id)?;

        d.reset();
        module.unmarshal_directives(d)?;
        Ok(module)
    }

    /// Instantiate and configure a module from JSON
    ///
    /// The object's `name` field selects the module; the remaining fields
    /// are the module's own configuration.
    pub fn load_json(&self, mut config: Value) -> ProviderResult<Box<dyn DnsProviderModule>> {
        let name = config
            .as_object_mut()
            .and_then(|obj| obj.remove("name"))
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or(ProviderError::MissingModuleName)?;

        let mut module = self.instantiate(&module_id(&name))?;
        module.load_json(config)?;
        Ok(module)
    }
}

/// Process-wide module registry, pre-populated with the builtin modules
pub fn modules() -> &'static ModuleRegistry {
    static MODULES: OnceLock<ModuleRegistry> = OnceLock::new();
    MODULES.get_or_init(ModuleRegistry::with_builtin_modules)
}

/// Register a module in the process-wide registry
pub fn register_module(info: ModuleInfo) -> ProviderResult<()> {
    modules().register(info)
}
