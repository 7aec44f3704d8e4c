//! Placeholder substitution for configuration values.
//!
//! Recognized placeholders:
//!
//! | Placeholder          | Value                                         |
//! |----------------------|-----------------------------------------------|
//! | `{$NAME}`            | environment variable `NAME`                   |
//! | `{$NAME:default}`    | `NAME`, or `default` when unset               |
//! | `{env.NAME}`         | environment variable `NAME`                   |
//! | `{system.os}`        | target operating system                       |
//! | `{system.arch}`      | target architecture                           |
//!
//! Anything else in braces is an unknown placeholder and expands to the
//! empty string. Braces that are empty or enclose whitespace are kept as
//! written. `\{` and `\}` produce literal braces.

use std::collections::HashMap;

/// Where environment lookups are resolved
#[derive(Debug, Clone)]
enum EnvSource {
    Process,
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    fn get(&self, name: &str) -> Option<String> {
        match self {
            EnvSource::Process => std::env::var(name).ok(),
            EnvSource::Fixed(vars) => vars.get(name).cloned(),
        }
    }
}

/// Expands placeholders in strings
#[derive(Debug, Clone)]
pub struct Replacer {
    env: EnvSource,
}

impl Replacer {
    /// Replacer backed by the process environment
    pub fn new() -> Self {
        Self {
            env: EnvSource::Process,
        }
    }

    /// Replacer that resolves environment placeholders from a fixed set
    pub fn with_env<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            env: EnvSource::Fixed(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Expand every placeholder in `input`; unknown ones become empty
    pub fn replace_all(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(idx) = rest.find(['{', '\\']) {
            out.push_str(&rest[..idx]);
            let tail = &rest[idx..];

            if let Some(escaped) = tail.strip_prefix('\\') {
                match escaped.chars().next() {
                    Some(c @ ('{' | '}')) => {
                        out.push(c);
                        rest = &escaped[1..];
                    }
                    _ => {
                        out.push('\\');
                        rest = escaped;
                    }
                }
                continue;
            }

            let Some(close) = tail.find('}') else {
                out.push_str(tail);
                return out;
            };
            let key = &tail[1..close];
            if let Some(inner) = key.rfind('{') {
                // rescan from the innermost opening brace, keeping its escape
                let restart = if key[..inner].ends_with('\\') {
                    inner
                } else {
                    inner + 1
                };
                out.push_str(&tail[..restart]);
                rest = &tail[restart..];
                continue;
            }
            if is_placeholder_key(key) {
                out.push_str(&self.resolve(key).unwrap_or_default());
            } else {
                out.push_str(&tail[..=close]);
            }
            rest = &tail[close + 1..];
        }

        out.push_str(rest);
        out
    }

    fn resolve(&self, key: &str) -> Option<String> {
        if let Some(var) = key.strip_prefix('$') {
            return match var.split_once(':') {
                Some((name, default)) => {
                    Some(self.env.get(name).unwrap_or_else(|| default.to_string()))
                }
                None => self.env.get(var),
            };
        }
        if let Some(name) = key.strip_prefix("env.") {
            return self.env.get(name);
        }
        match key {
            "system.os" => Some(std::env::consts::OS.to_string()),
            "system.arch" => Some(std::env::consts::ARCH.to_string()),
            _ => None,
        }
    }
}

impl Default for Replacer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && !key.contains(char::is_whitespace)
}
