//! Errors raised while configuring DNS provider modules

use std::fmt;

use rcodezero_common::RegistryError;
use rcodezero_config::{DirectiveError, Position};
use thiserror::Error;

/// Result type for provider module operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// A configurable provider setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    ApiToken,
    BaseUrl,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigField::ApiToken => f.write_str("API token"),
            ConfigField::BaseUrl => f.write_str("Base URL"),
        }
    }
}

/// Errors that can occur while parsing, loading or provisioning a module
///
/// All of them are fatal to module initialization.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Malformed directive input (argument count, quoting, braces)
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    /// A setting was assigned twice
    #[error("{field} already set, at {position}")]
    DuplicateField { field: ConfigField, position: Position },

    /// Sub-directive name not understood by the module
    #[error("unrecognized subdirective '{name}', at {position}")]
    UnknownSubdirective { name: String, position: Position },

    /// Parsing finished without an API token
    #[error("missing API token, at {position}")]
    MissingApiToken { position: Position },

    /// The API token is empty after placeholder substitution
    #[error("rcodezero: missing api token")]
    EmptyApiToken,

    /// Provisioning ran twice on one instance
    #[error("module '{module}' is already provisioned")]
    AlreadyProvisioned { module: &'static str },

    /// No module registered under this ID
    #[error("unknown module '{id}'")]
    UnknownModule { id: String },

    /// JSON configuration without a `name` selecting the module
    #[error("module configuration is missing the 'name' field")]
    MissingModuleName,

    /// JSON configuration could not be decoded
    #[error("invalid JSON configuration for module '{module}': {source}")]
    Json {
        module: String,
        #[source]
        source: serde_json::Error,
    },

    /// Module registration failed
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_display() {
        let position = Position::new("Caddyfile", 4);

        let err = ProviderError::DuplicateField {
            field: ConfigField::ApiToken,
            position: position.clone(),
        };
        assert_eq!(err.to_string(), "API token already set, at Caddyfile:4");

        let err = ProviderError::DuplicateField {
            field: ConfigField::BaseUrl,
            position: position.clone(),
        };
        assert!(err.to_string().starts_with("Base URL already set"));

        let err = ProviderError::UnknownSubdirective {
            name: "zone".to_string(),
            position: position.clone(),
        };
        assert_eq!(
            err.to_string(),
            "unrecognized subdirective 'zone', at Caddyfile:4"
        );

        let err = ProviderError::MissingApiToken { position };
        assert!(err.to_string().contains("missing API token"));

        assert_eq!(
            ProviderError::EmptyApiToken.to_string(),
            "rcodezero: missing api token"
        );
    }
}
