use crate::{GateError, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;
use kube::api::ListParams;
use kube::{Api, Client};
use tracing::{debug, info};

/// Read access to pods in the cluster
///
/// An empty `namespace` means all namespaces.
#[async_trait]
pub trait PodSource: Send + Sync {
    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>>;
}

pub struct KubePodSource {
    client: Client,
}

impl KubePodSource {
    /// Build a client from the service account mounted into the pod.
    ///
    /// Fails outside a cluster. Errors are returned as-is.
    pub async fn in_cluster() -> Result<Self> {
        debug!("Loading in-cluster Kubernetes credentials");

        let config = kube::Config::incluster()?;
        let client = Client::try_from(config)?;

        info!("Kubernetes client ready");

        Ok(Self { client })
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        if namespace.is_empty() {
            Api::all(self.client.clone())
        } else {
            Api::namespaced(self.client.clone(), namespace)
        }
    }
}

#[async_trait]
impl PodSource for KubePodSource {
    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>> {
        let params = ListParams::default().labels(label_selector);

        let pod_list = self
            .pods(namespace)
            .list(&params)
            .await
            .map_err(|e| GateError::Query(format!("Failed to list pods: {}", e)))?;

        Ok(pod_list.items)
    }
}
