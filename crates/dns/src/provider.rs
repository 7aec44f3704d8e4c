//! RcodeZero DNS provider module
//!
//! Lets the host solve ACME DNS-01 challenges through the RcodeZero ACME
//! API. The module only configures the backend; record management happens
//! there.
//!
//! # Directive syntax
//!
//! ```text
//! rcodezero {
//!     api_token <token>
//!     base_url  <url>     # optional
//! }
//! ```
//!
//! or, with only a token:
//!
//! ```text
//! rcodezero <token>
//! ```

use rcodezero_config::Dispenser;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::backend::AcmeDnsConfig;
use crate::error::{ConfigField, ProviderError, ProviderResult};
use crate::module::{DnsProviderModule, ModuleInfo, ProvisionContext};

/// Module ID of the RcodeZero provider
pub const MODULE_ID: &str = "dns.providers.rcodezero";

/// DNS provider module wrapping the RcodeZero backend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcodeZeroProvider {
    config: AcmeDnsConfig,
    provisioned: bool,
}

fn new_module() -> Box<dyn DnsProviderModule> {
    Box::new(RcodeZeroProvider::new())
}

impl RcodeZeroProvider {
    /// Registration record of this module
    pub const MODULE_INFO: ModuleInfo = ModuleInfo {
        id: MODULE_ID,
        new: new_module,
    };

    /// Unconfigured provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider wrapping an already populated backend configuration
    pub fn from_config(config: AcmeDnsConfig) -> Self {
        Self {
            config,
            provisioned: false,
        }
    }

    /// Backend configuration
    pub fn config(&self) -> &AcmeDnsConfig {
        &self.config
    }

    /// Hand the configuration over to the backend
    pub fn into_config(self) -> AcmeDnsConfig {
        self.config
    }

    /// Whether placeholders have been expanded and the token validated
    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    fn field(&self, field: ConfigField) -> &str {
        match field {
            ConfigField::ApiToken => &self.config.api_token,
            ConfigField::BaseUrl => &self.config.base_url,
        }
    }

    fn field_mut(&mut self, field: ConfigField) -> &mut String {
        match field {
            ConfigField::ApiToken => &mut self.config.api_token,
            ConfigField::BaseUrl => &mut self.config.base_url,
        }
    }

    fn ensure_unset(&self, field: ConfigField, d: &Dispenser) -> ProviderResult<()> {
        if self.field(field).is_empty() {
            Ok(())
        } else {
            Err(ProviderError::DuplicateField {
                field,
                position: d.position(),
            })
        }
    }

    /// Parse `<subdirective> <value>` inside the block
    fn parse_subdirective(&mut self, field: ConfigField, d: &mut Dispenser) -> ProviderResult<()> {
        self.ensure_unset(field, d)?;
        if !d.next_arg() {
            return Err(d.arg_err().into());
        }
        *self.field_mut(field) = d.val().to_string();
        if d.next_arg() {
            return Err(d.arg_err().into());
        }
        Ok(())
    }
}

impl DnsProviderModule for RcodeZeroProvider {
    fn module_info(&self) -> ModuleInfo {
        Self::MODULE_INFO
    }

    fn unmarshal_directives(&mut self, d: &mut Dispenser) -> ProviderResult<()> {
        while d.next() {
            // inline token: rcodezero <token>
            if d.next_arg() {
                self.ensure_unset(ConfigField::ApiToken, d)?;
                self.config.api_token = d.val().to_string();
            }
            if d.next_arg() {
                return Err(d.arg_err().into());
            }

            let nesting = d.nesting();
            while d.next_block(nesting) {
                match d.val() {
                    "api_token" => self.parse_subdirective(ConfigField::ApiToken, d)?,
                    "base_url" => self.parse_subdirective(ConfigField::BaseUrl, d)?,
                    other => {
                        return Err(ProviderError::UnknownSubdirective {
                            name: other.to_string(),
                            position: d.position(),
                        });
                    }
                }
            }
        }

        if self.config.api_token.is_empty() {
            return Err(ProviderError::MissingApiToken {
                position: d.position(),
            });
        }

        debug!(
            module = MODULE_ID,
            custom_base_url = !self.config.base_url.is_empty(),
            "Parsed provider directives"
        );
        Ok(())
    }

    fn load_json(&mut self, config: Value) -> ProviderResult<()> {
        self.config = serde_json::from_value(config).map_err(|source| ProviderError::Json {
            module: MODULE_ID.to_string(),
            source,
        })?;
        Ok(())
    }

    fn provision(&mut self, ctx: &ProvisionContext) -> ProviderResult<()> {
        if self.provisioned {
            return Err(ProviderError::AlreadyProvisioned { module: MODULE_ID });
        }

        let repl = ctx.replacer();
        let api_token = repl.replace_all(&self.config.api_token);
        if api_token.is_empty() {
            return Err(ProviderError::EmptyApiToken);
        }
        let base_url = repl.replace_all(&self.config.base_url);

        self.config.api_token = api_token;
        self.config.base_url = base_url;
        self.provisioned = true;
        info!(
            module = MODULE_ID,
            base_url = %self.config.effective_base_url(),
            "Provisioned DNS provider"
        );
        Ok(())
    }

    fn to_json(&self) -> Value {
        let mut value = json!({ "name": Self::MODULE_INFO.name() });
        if let (Some(obj), Ok(Value::Object(fields))) =
            (value.as_object_mut(), serde_json::to_value(&self.config))
        {
            obj.extend(fields);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcodezero_config::{DirectiveErrorKind, Replacer};

    fn parse(input: &str) -> ProviderResult<RcodeZeroProvider> {
        let mut d = Dispenser::test(input)?;
        let mut provider = RcodeZeroProvider::new();
        provider.unmarshal_directives(&mut d)?;
        Ok(provider)
    }

    fn provision_with(
        provider: &mut RcodeZeroProvider,
        vars: &[(&str, &str)],
    ) -> ProviderResult<()> {
        let ctx = ProvisionContext::new(Replacer::with_env(vars.iter().copied()));
        provider.provision(&ctx)
    }

    #[test]
    fn test_single_arg() {
        let p = parse("rcodezero abc123").unwrap();
        assert_eq!(p.config().api_token, "abc123");
        assert_eq!(p.config().base_url, "");
    }

    #[test]
    fn test_api_token_in_block() {
        let p = parse("rcodezero {\n\tapi_token abc123\n}").unwrap();
        assert_eq!(p.config().api_token, "abc123");
        assert_eq!(p.config().base_url, "");
    }

    #[test]
    fn test_base_url_in_block() {
        let p = parse("rcodezero {\n\tapi_token abc123\n\tbase_url https://my.example.at\n}")
            .unwrap();
        assert_eq!(p.config().api_token, "abc123");
        assert_eq!(p.config().base_url, "https://my.example.at");
    }

    #[test]
    fn test_empty_config() {
        let err = parse("rcodezero").unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiToken { .. }));
        assert!(err.to_string().contains("missing API token"));
    }

    #[test]
    fn test_too_many_args() {
        let err = parse("rcodezero abc123 extra").unwrap_err();
        match err {
            ProviderError::Directive(e) => assert_eq!(
                e.kind,
                DirectiveErrorKind::ArgumentCount {
                    after: "abc123".to_string()
                }
            ),
            other => panic!("expected argument count error, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_token() {
        let err = parse("rcodezero {\n\tapi_token abc\n\tapi_token def\n}").unwrap_err();
        assert!(matches!(
            err,
            ProviderError::DuplicateField {
                field: ConfigField::ApiToken,
                ..
            }
        ));
        assert!(err.to_string().contains("API token already set"));
    }

    #[test]
    fn test_provision_missing_token_fails() {
        let mut p = RcodeZeroProvider::new();
        let err = provision_with(&mut p, &[]).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyApiToken));
        assert!(!p.is_provisioned());
    }

    #[test]
    fn test_failed_provision_leaves_config_untouched() {
        let config = AcmeDnsConfig::new("{$UNSET}").with_base_url("{$URL}");
        let mut p = RcodeZeroProvider::from_config(config.clone());
        let env = [("URL", "{$NESTED}"), ("NESTED", "https://b")];

        for _ in 0..2 {
            let err = provision_with(&mut p, &env).unwrap_err();
            assert!(matches!(err, ProviderError::EmptyApiToken));
            assert_eq!(p.config(), &config);
            assert!(!p.is_provisioned());
        }
    }

    #[test]
    fn test_provision_expands_base_url_once() {
        let config = AcmeDnsConfig::new("abc").with_base_url("{$URL}");
        let mut p = RcodeZeroProvider::from_config(config);
        provision_with(&mut p, &[("URL", "{$NESTED}"), ("NESTED", "https://b")]).unwrap();
        assert_eq!(p.config().base_url, "{$NESTED}");
    }

    #[test]
    fn test_provision_token_ok() {
        let mut p = RcodeZeroProvider::from_config(AcmeDnsConfig::new("abc123"));
        provision_with(&mut p, &[]).unwrap();
        assert!(p.is_provisioned());
        assert_eq!(p.config().api_token, "abc123");
    }

    #[test]
    fn test_provision_runs_once() {
        let mut p = RcodeZeroProvider::from_config(AcmeDnsConfig::new("abc123"));
        provision_with(&mut p, &[]).unwrap();
        let err = provision_with(&mut p, &[]).unwrap_err();
        assert!(matches!(err, ProviderError::AlreadyProvisioned { .. }));
    }

    #[test]
    fn test_to_json() {
        let p = parse("rcodezero {\n api_token abc\n base_url https://b\n}").unwrap();
        assert_eq!(
            p.to_json(),
            json!({ "name": "rcodezero", "api_token": "abc", "base_url": "https://b" })
        );

        let p = parse("rcodezero abc").unwrap();
        assert_eq!(p.to_json(), json!({ "name": "rcodezero", "api_token": "abc" }));
    }

    #[test]
    fn test_load_json() {
        let mut p = RcodeZeroProvider::new();
        p.load_json(json!({ "api_token": "{$TOKEN}" })).unwrap();
        assert_eq!(p.config().api_token, "{$TOKEN}");

        let err = p.load_json(json!({ "api_key": "x" })).unwrap_err();
        assert!(matches!(err, ProviderError::Json { .. }));
    }
}
