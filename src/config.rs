//! Policy configuration
//!
//! Every value interpolated into the policy document or the resource URI lives
//! in [`PolicyConfig`]. The defaults are the capstone dev environment; a JSON
//! file can override any subset of top-level fields:
//!
//! ```json
//! {
//!   "service_name": "apim-capstone-test",
//!   "backend_b": {
//!     "marker": "/B:",
//!     "base_url": "http://10.0.0.12:8080",
//!     "rewrite_uri": "/api/b"
//!   }
//! }
//! ```
//!
//! Values are substituted verbatim. Nothing is XML-escaped, so URLs and origins
//! must not contain `<`, `>`, `&`, `"` or `'`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Characters that would break the rendered XML when substituted verbatim
const XML_SIGNIFICANT: &[char] = &['<', '>', '&', '"', '\''];

/// One `<when>` branch of the routing policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingRule {
    /// Substring the request path must contain, e.g. `/A:`
    pub marker: String,
    /// Backend base URL the request is forwarded to
    pub base_url: String,
    /// Path the request URI is rewritten to
    pub rewrite_uri: String,
}

impl RoutingRule {
    pub fn new(
        marker: impl Into<String>,
        base_url: impl Into<String>,
        rewrite_uri: impl Into<String>,
    ) -> Self {
        Self {
            marker: marker.into(),
            base_url: base_url.into(),
            rewrite_uri: rewrite_uri.into(),
        }
    }
}

/// Everything needed to render, address and submit the policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PolicyConfig {
    pub subscription_id: String,
    pub resource_group: String,
    /// Resource provider namespace, `Microsoft.ApiManagement`
    pub provider: String,
    /// API Management service instance name
    pub service_name: String,
    pub api_id: String,
    /// Management API version appended as `api-version`
    pub api_version: String,

    pub backend_a: RoutingRule,
    pub backend_b: RoutingRule,

    /// Origins allowed by the CORS stage
    pub frontend_origins: Vec<String>,
    /// `preflight-result-max-age` on the allowed methods, in seconds
    pub preflight_max_age: u32,

    /// Management CLI executable (name on PATH or explicit path)
    pub tool: String,
    /// Where the JSON request body is written before submission
    pub payload_path: PathBuf,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            subscription_id: "606e824b-aaf7-4b4e-9057-b459f6a4436d".to_string(),
            resource_group: "ari-rg-capstone-dev".to_string(),
            provider: "Microsoft.ApiManagement".to_string(),
            service_name: "apim-capstone-dev-ari999".to_string(),
            api_id: "backends".to_string(),
            api_version: "2021-08-01".to_string(),
            backend_a: RoutingRule::new("/A:", "http://132.196.250.187:8080", "/api/a"),
            backend_b: RoutingRule::new("/B:", "http://68.220.237.26:8080", "/api/b"),
            frontend_origins: vec![
                "http://app-capstone-ui-dev-ari999.azurewebsites.net".to_string(),
                "https://app-capstone-ui-dev-ari999.azurewebsites.net".to_string(),
            ],
            preflight_max_age: 300,
            tool: "az".to_string(),
            payload_path: PathBuf::from("policy-payload.json"),
        }
    }
}

impl PolicyConfig {
    /// Load config from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Routing rules in the order they are evaluated by the gateway
    pub fn routing_rules(&self) -> [&RoutingRule; 2] {
        [&self.backend_a, &self.backend_b]
    }

    /// Reject values that would yield a broken URI or policy.
    ///
    /// XML-significant characters only produce a warning: substitution is
    /// verbatim and the caller owns the values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let segments = [
            ("subscription_id", &self.subscription_id),
            ("resource_group", &self.resource_group),
            ("provider", &self.provider),
            ("service_name", &self.service_name),
            ("api_id", &self.api_id),
            ("api_version", &self.api_version),
            ("tool", &self.tool),
        ];
        for (field, value) in segments {
            if value.trim().is_empty() {
                return Err(invalid(field, "must not be empty"));
            }
        }

        for (field, rule) in [("backend_a", &self.backend_a), ("backend_b", &self.backend_b)] {
            if rule.marker.is_empty() {
                return Err(invalid(field, "routing marker must not be empty"));
            }
            if !is_http_url(&rule.base_url) {
                return Err(invalid(
                    field,
                    format!("base_url '{}' must start with http:// or https://", rule.base_url),
                ));
            }
            warn_if_xml_significant(field, &rule.base_url);
            warn_if_xml_significant(field, &rule.rewrite_uri);
        }

        if self.frontend_origins.is_empty() {
            return Err(invalid("frontend_origins", "at least one origin is required"));
        }
        for origin in &self.frontend_origins {
            warn_if_xml_significant("frontend_origins", origin);
        }

        if self.payload_path.as_os_str().is_empty() {
            return Err(invalid("payload_path", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn warn_if_xml_significant(field: &str, value: &str) {
    if value.contains(XML_SIGNIFICANT) {
        log::warn!(
            "{field} value '{value}' contains XML-significant characters; it is substituted unescaped"
        );
    }
}
