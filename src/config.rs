//! Plugin configuration
//!
//! Every field is optional on the wire. Required fields are only enforced
//! by [`GateConfig::validate`], and only when the gate is enabled.

use crate::{GateError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the gate does with a request that carries the required header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentAction {
    /// Delegate to the next handler
    #[default]
    Forward,
    /// Write nothing and do not call the next handler
    Drop,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GateConfig {
    pub header: String,
    pub service_name: String,
    #[serde(rename = "dataSourceURL")]
    pub data_source_url: String,
    pub enabled: bool,
    pub namespace: String,
    pub on_header_present: PresentAction,
}

impl GateConfig {
    /// Parse the JSON blob a host hands to the plugin
    pub fn from_json(data: &[u8]) -> Result<Self> {
        serde_json::from_slice(data).map_err(GateError::ConfigJson)
    }

    /// Load a YAML or JSON config file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| GateError::ConfigLoad {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Check required fields in order: header, serviceName, dataSourceURL.
    ///
    /// Only the first failure is reported.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("header", &self.header),
            ("serviceName", &self.service_name),
            ("dataSourceURL", &self.data_source_url),
        ];

        for (field, value) in required {
            if value.is_empty() {
                return Err(GateError::Configuration(format!(
                    "{} must not be empty",
                    field
                )));
            }
        }

        Ok(())
    }

    /// Label selector used to find the service's pods
    pub fn label_selector(&self) -> String {
        crate::k8s::app_selector(&self.service_name)
    }
}
