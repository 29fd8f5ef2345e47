//! Gateway configuration.
//!
//! The option set mirrors the remote driver's historical configuration
//! surface: a fixed set of named options, mutated through name-keyed
//! accessors that fail closed on unknown names, with `api_version`
//! additionally validated against the supported-version set.

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{ClientError, Result};

/// API versions this client can speak.
pub const SUPPORTED_API_VERSIONS: &[&str] = &["v1"];

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default request quota used when reporting rate-limit exhaustion.
pub const DEFAULT_API_LIMIT: u64 = 5000;

/// Default User-Agent header value.
pub const DEFAULT_USER_AGENT: &str =
    "drupal-remote-driver (https://github.com/fitchmultz/drupal-remote-driver)";

/// The recognized option names, in the order they are reported.
const OPTION_NAMES: &[&str] = &[
    "base_url",
    "user_agent",
    "timeout",
    "api_limit",
    "api_version",
    "skip_verify",
    "cache_dir",
];

/// Named options owned exclusively by the [`Gateway`](crate::Gateway).
///
/// Handlers see configuration only through the Gateway's immutable view.
#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub api_limit: u64,
    pub api_version: String,
    /// Disables TLS certificate verification on the transport.
    pub skip_verify: bool,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: "https://some-url.com".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_limit: DEFAULT_API_LIMIT,
            api_version: "v1".to_string(),
            skip_verify: false,
            cache_dir: None,
        }
    }
}

impl Options {
    /// Look up an option by name.
    ///
    /// Fails with [`ClientError::UnknownOption`] for unrecognized names.
    pub fn get(&self, name: &str) -> Result<Value> {
        match name {
            "base_url" => Ok(Value::from(self.base_url.as_str())),
            "user_agent" => Ok(Value::from(self.user_agent.as_str())),
            "timeout" => Ok(Value::from(self.timeout_secs)),
            "api_limit" => Ok(Value::from(self.api_limit)),
            "api_version" => Ok(Value::from(self.api_version.as_str())),
            "skip_verify" => Ok(Value::from(self.skip_verify)),
            "cache_dir" => Ok(self
                .cache_dir
                .as_ref()
                .map(|p| Value::from(p.to_string_lossy().into_owned()))
                .unwrap_or(Value::Null)),
            _ => Err(ClientError::UnknownOption(name.to_string())),
        }
    }

    /// Set an option by name, validating the name and value first.
    ///
    /// Unknown names fail with [`ClientError::UnknownOption`]; setting
    /// `api_version` to anything outside [`SUPPORTED_API_VERSIONS`] fails
    /// with [`ClientError::UnsupportedVersion`]. Stored configuration is
    /// only mutated after validation passes.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "base_url" => {
                // Strip trailing slashes so path joining never doubles them.
                self.base_url = Self::expect_str(name, &value)?
                    .trim_end_matches('/')
                    .to_string();
            }
            "user_agent" => {
                self.user_agent = Self::expect_str(name, &value)?.to_string();
            }
            "timeout" => self.timeout_secs = Self::expect_u64(name, &value)?,
            "api_limit" => self.api_limit = Self::expect_u64(name, &value)?,
            "api_version" => {
                let version = Self::expect_str(name, &value)?;
                if !SUPPORTED_API_VERSIONS.contains(&version) {
                    return Err(ClientError::UnsupportedVersion {
                        requested: version.to_string(),
                        supported: SUPPORTED_API_VERSIONS.join(", "),
                    });
                }
                self.api_version = version.to_string();
            }
            "skip_verify" => {
                self.skip_verify = value.as_bool().ok_or(ClientError::InvalidOptionValue {
                    name: name.to_string(),
                    expected: "boolean",
                })?;
            }
            "cache_dir" => {
                self.cache_dir = match value {
                    Value::Null => None,
                    Value::String(s) => Some(PathBuf::from(s)),
                    _ => {
                        return Err(ClientError::InvalidOptionValue {
                            name: name.to_string(),
                            expected: "string or null",
                        });
                    }
                };
            }
            _ => return Err(ClientError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// The `/api/{api_version}` prefix every resource path hangs off.
    pub fn base_path(&self) -> String {
        format!("/api/{}", self.api_version)
    }

    /// Names this option set recognizes.
    pub fn names() -> &'static [&'static str] {
        OPTION_NAMES
    }

    fn expect_str<'v>(name: &str, value: &'v Value) -> Result<&'v str> {
        value.as_str().ok_or(ClientError::InvalidOptionValue {
            name: name.to_string(),
            expected: "string",
        })
    }

    fn expect_u64(name: &str, value: &Value) -> Result<u64> {
        value.as_u64().ok_or(ClientError::InvalidOptionValue {
            name: name.to_string(),
            expected: "unsigned integer",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_option_rejected_on_get_and_set() {
        let mut options = Options::default();
        assert!(matches!(
            options.get("curl.options"),
            Err(ClientError::UnknownOption(_))
        ));
        assert!(matches!(
            options.set("curl.options", json!({})),
            Err(ClientError::UnknownOption(_))
        ));
    }

    #[test]
    fn test_unsupported_api_version_rejected() {
        let mut options = Options::default();
        let err = options.set("api_version", json!("v2")).unwrap_err();
        assert!(matches!(err, ClientError::UnsupportedVersion { .. }));
        // The stored value is untouched by the failed mutation.
        assert_eq!(options.api_version, "v1");
    }

    #[test]
    fn test_supported_api_version_accepted() {
        let mut options = Options::default();
        options.set("api_version", json!("v1")).unwrap();
        assert_eq!(options.base_path(), "/api/v1");
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let mut options = Options::default();
        options
            .set("base_url", json!("http://192.168.44.44/drupal/"))
            .unwrap();
        assert_eq!(
            options.get("base_url").unwrap(),
            json!("http://192.168.44.44/drupal")
        );
    }

    #[test]
    fn test_wrong_value_shape_rejected() {
        let mut options = Options::default();
        let err = options.set("timeout", json!("fast")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidOptionValue { .. }));
        assert_eq!(options.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_cache_dir_roundtrip() {
        let mut options = Options::default();
        assert_eq!(options.get("cache_dir").unwrap(), Value::Null);
        options.set("cache_dir", json!("/tmp/remote-api")).unwrap();
        assert_eq!(options.get("cache_dir").unwrap(), json!("/tmp/remote-api"));
        options.set("cache_dir", Value::Null).unwrap();
        assert_eq!(options.get("cache_dir").unwrap(), Value::Null);
    }
}
