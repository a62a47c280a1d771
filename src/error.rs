use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("{0}")]
    Configuration(String),

    #[error(transparent)]
    InClusterConfig(#[from] kube::config::InClusterError),

    #[error(transparent)]
    Client(#[from] kube::Error),

    #[error("Kubernetes query failed: {0}")]
    Query(String),

    #[error("Failed to read config file {}: {source}", .path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("Invalid plugin configuration: {0}")]
    ConfigJson(#[source] serde_json::Error),

    #[error("Failed to serialize error response: {0}")]
    Serialization(#[source] serde_json::Error),
}

impl GateError {
    /// True for failures raised while obtaining credentials or building the client.
    pub fn is_initialization(&self) -> bool {
        matches!(self, Self::InClusterConfig(_) | Self::Client(_))
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
