//! Management API request body for `PUT .../policies/policy`

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::UpdateError;
use crate::policy::PolicyDocument;

/// Encoding of the policy `value` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyFormat {
    /// Policy XML sent as-is, without escaping into `xml` form
    #[serde(rename = "rawxml")]
    RawXml,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyProperties {
    pub format: PolicyFormat,
    pub value: String,
}

/// `{"properties": {"format": "rawxml", "value": <policy xml>}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyPayload {
    pub properties: PolicyProperties,
}

impl PolicyPayload {
    pub fn new(document: PolicyDocument) -> Self {
        Self {
            properties: PolicyProperties {
                format: PolicyFormat::RawXml,
                value: document.into_string(),
            },
        }
    }

    /// Two-space indented JSON, as written to disk
    pub fn to_pretty_json(&self) -> Result<String, UpdateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write `payload` to `path`, replacing any previous file.
///
/// Parent directories are not created; a missing directory is a failure.
pub async fn write_payload(path: &Path, payload: &PolicyPayload) -> Result<(), UpdateError> {
    let json = payload.to_pretty_json()?;

    tokio::fs::write(path, json.as_bytes())
        .await
        .map_err(|source| UpdateError::PayloadWrite {
            path: path.to_path_buf(),
            source,
        })?;

    log::debug!("Wrote {} bytes of policy payload to {}", json.len(), path.display());
    Ok(())
}
