//! Conversion of provider configuration between directive and JSON form
//!
//! A directive file holds one top-level directive per provider; the
//! directive name selects the module. A JSON document is either one module
//! object or an array of them, each with a `name` field.

use rcodezero_config::Dispenser;
use serde_json::Value;
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};
use crate::module::{DnsProviderModule, ModuleRegistry, ProvisionContext};

/// Configured module instances
pub type Modules = Vec<Box<dyn DnsProviderModule>>;

/// Parse every top-level directive of a directive file into a module
pub fn parse_directives(
    registry: &ModuleRegistry,
    file: &str,
    input: &str,
) -> ProviderResult<Modules> {
    let mut d = Dispenser::from_source(file, input)?;
    let mut modules = Vec::new();

    while d.next() {
        let mut segment = d.new_from_next_segment();
        let module = registry.unmarshal_segment(&mut segment)?;
        debug!(file = %file, module = module.module_info().id, "Adapted directive");
        modules.push(module);
    }

    Ok(modules)
}

/// Load modules from a JSON document
pub fn parse_json(registry: &ModuleRegistry, input: &str) -> ProviderResult<Modules> {
    let value: Value = serde_json::from_str(input).map_err(|source| ProviderError::Json {
        module: "<document>".to_string(),
        source,
    })?;

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| registry.load_json(item))
            .collect(),
        other => Ok(vec![registry.load_json(other)?]),
    }
}

/// Provision every module, stopping at the first failure
pub fn provision_all(
    modules: &mut [Box<dyn DnsProviderModule>],
    ctx: &ProvisionContext,
) -> ProviderResult<()> {
    for module in modules.iter_mut() {
        module.provision(ctx)?;
    }
    Ok(())
}

/// JSON document for a set of modules
pub fn to_json(modules: &[Box<dyn DnsProviderModule>]) -> Value {
    Value::Array(modules.iter().map(|m| m.to_json()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcodezero_config::Replacer;
    use serde_json::json;

    #[test]
    fn test_parse_directives_multiple_segments() {
        let registry = ModuleRegistry::with_builtin_modules();
        let input = "rcodezero abc\n\nrcodezero {\n  api_token def\n  base_url https://b\n}\n";

        let modules = parse_directives(&registry, "Caddyfile", input).unwrap();
        assert_eq!(
            to_json(&modules),
            json!([
                { "name": "rcodezero", "api_token": "abc" },
                { "name": "rcodezero", "api_token": "def", "base_url": "https://b" }
            ])
        );
    }

    #[test]
    fn test_parse_directives_reports_segment_errors() {
        let registry = ModuleRegistry::with_builtin_modules();
        let input = "rcodezero abc\nrcodezero {\n  zone example.at\n}\n";

        let err = parse_directives(&registry, "Caddyfile", input).unwrap_err();
        assert_eq!(err.to_string(), "unrecognized subdirective 'zone', at Caddyfile:3");
    }

    #[test]
    fn test_parse_json_object_and_array() {
        let registry = ModuleRegistry::with_builtin_modules();

        let modules =
            parse_json(&registry, r#"{"name": "rcodezero", "api_token": "abc"}"#).unwrap();
        assert_eq!(modules.len(), 1);

        let modules = parse_json(
            &registry,
            r#"[{"name": "rcodezero", "api_token": "a"}, {"name": "rcodezero", "api_token": "b"}]"#,
        )
        .unwrap();
        assert_eq!(modules.len(), 2);

        assert!(parse_json(&registry, "not json").is_err());
    }

    #[test]
    fn test_provision_all_expands_placeholders() {
        let registry = ModuleRegistry::with_builtin_modules();
        let mut modules =
            parse_directives(&registry, "Caddyfile", "rcodezero {$RCODEZERO_API_TOKEN}").unwrap();

        let ctx = ProvisionContext::new(Replacer::with_env([("RCODEZERO_API_TOKEN", "secret")]));
        provision_all(&mut modules, &ctx).unwrap();
        assert_eq!(
            to_json(&modules),
            json!([{ "name": "rcodezero", "api_token": "secret" }])
        );
    }

    #[test]
    fn test_provision_all_fails_on_empty_token() {
        let registry = ModuleRegistry::with_builtin_modules();
        let mut modules =
            parse_directives(&registry, "Caddyfile", "rcodezero {$RCODEZERO_API_TOKEN}").unwrap();

        let ctx = ProvisionContext::new(Replacer::with_env(Vec::<(String, String)>::new()));
        let err = provision_all(&mut modules, &ctx).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyApiToken));
    }
}
