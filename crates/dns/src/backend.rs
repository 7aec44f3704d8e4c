//! Configuration handed to the RcodeZero ACME DNS backend
//!
//! The backend performs the actual TXT record creation and deletion over
//! HTTP. This crate only fills in and validates its two settings.

use std::fmt;

use serde::{Deserialize, Serialize};

/// RcodeZero ACME API base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "https://my.rcodezero.at/api/v1/acme";

/// Settings consumed by the RcodeZero ACME DNS backend
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AcmeDnsConfig {
    /// API token with ACME permissions on the zones
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_token: String,

    /// API base URL; empty means [`DEFAULT_BASE_URL`]
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub base_url: String,
}

impl AcmeDnsConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: String::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// The base URL the backend will talk to
    pub fn effective_base_url(&self) -> &str {
        if self.base_url.is_empty() {
            DEFAULT_BASE_URL
        } else {
            &self.base_url
        }
    }
}

impl fmt::Debug for AcmeDnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = if self.api_token.is_empty() {
            ""
        } else {
            "<redacted>"
        };
        f.debug_struct("AcmeDnsConfig")
            .field("api_token", &token)
            .field("base_url", &self.base_url)
            .finish()
    }
}
