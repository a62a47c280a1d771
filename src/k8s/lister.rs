//! Pod lister for the gated service
//!
//! Lists the pods labelled `app=<serviceName>` and logs their names. Never
//! called from the request path: callers trigger it once or on an interval.

use super::{PodInfo, PodSource};
use crate::config::GateConfig;
use crate::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// Label selector matching the pods of `service_name`
pub fn app_selector(service_name: &str) -> String {
    format!("app={}", service_name)
}

#[derive(Clone)]
pub struct PodLister {
    source: Arc<dyn PodSource>,
    namespace: String,
    service_name: String,
}

impl PodLister {
    pub fn new(
        source: Arc<dyn PodSource>,
        namespace: impl Into<String>,
        service_name: impl Into<String>,
    ) -> Self {
        Self {
            source,
            namespace: namespace.into(),
            service_name: service_name.into(),
        }
    }

    /// Build a lister for an already validated configuration
    pub fn from_config(source: Arc<dyn PodSource>, config: &GateConfig) -> Self {
        Self::new(source, &config.namespace, &config.service_name)
    }

    pub fn label_selector(&self) -> String {
        app_selector(&self.service_name)
    }

    /// Query the cluster for the service's pods
    pub async fn list(&self) -> Result<Vec<PodInfo>> {
        let pods = self
            .source
            .list_pods(&self.namespace, &self.label_selector())
            .await?;

        Ok(pods.iter().map(PodInfo::from_k8s_pod).collect())
    }

    /// Log each pod name. Query failures are logged and swallowed.
    ///
    /// Returns how many pods were logged.
    pub async fn log_pods(&self) -> usize {
        match self.list().await {
            Ok(pods) => {
                for pod in &pods {
                    info!("Pod name {}", pod.name);
                }
                pods.len()
            }
            Err(e) => {
                error!("Error: {}", e);
                0
            }
        }
    }

    /// Run [`PodLister::log_pods`] every `interval` until `shutdown` resolves.
    ///
    /// The first listing happens immediately.
    pub async fn run_periodic<F>(&self, interval: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!(
            "Listing pods with selector {} every {:?}",
            self.label_selector(),
            interval
        );

        let mut ticker = tokio::time::interval(interval);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping pod listing");
                    break;
                }
                _ = ticker.tick() => {
                    self.log_pods().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GateError;
    use async_trait::async_trait;
    use k8s_openapi::api::core::v1::Pod;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSource {
        calls: Mutex<Vec<(String, String)>>,
        names: Vec<&'static str>,
        fail: bool,
    }

    #[async_trait]
    impl PodSource for RecordingSource {
        async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>> {
            self.calls
                .lock()
                .unwrap()
                .push((namespace.to_string(), label_selector.to_string()));

            if self.fail {
                return Err(GateError::Query("connection refused".to_string()));
            }

            Ok(self
                .names
                .iter()
                .map(|name| Pod {
                    metadata: ObjectMeta {
                        name: Some(name.to_string()),
                        namespace: Some(namespace.to_string()),
                        ..Default::default()
                    },
                    ..Default::default()
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_list_uses_app_selector() {
        let source = Arc::new(RecordingSource {
            names: vec!["billing-1", "billing-2"],
            ..Default::default()
        });
        let lister = PodLister::new(source.clone(), "prod", "billing");

        let pods = lister.list().await.expect("Should list");

        assert_eq!(pods.len(), 2);
        assert_eq!(pods[0].name, "billing-1");
        assert_eq!(pods[1].namespace, "prod");
        assert_eq!(
            source.calls.lock().unwrap().as_slice(),
            &[("prod".to_string(), "app=billing".to_string())]
        );
    }

    #[tokio::test]
    async fn test_log_pods_counts() {
        let source = Arc::new(RecordingSource {
            names: vec!["a", "b", "c"],
            ..Default::default()
        });
        let lister = PodLister::new(source, "", "web");

        assert_eq!(lister.log_pods().await, 3);
    }

    #[tokio::test]
    async fn test_log_pods_swallows_query_error() {
        let source = Arc::new(RecordingSource {
            fail: true,
            ..Default::default()
        });
        let lister = PodLister::new(source.clone(), "prod", "billing");

        assert!(lister.list().await.is_err());
        assert_eq!(lister.log_pods().await, 0);
        assert_eq!(source.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_periodic_stops_on_shutdown() {
        let source = Arc::new(RecordingSource {
            names: vec!["billing-1"],
            ..Default::default()
        });
        let lister = PodLister::new(source.clone(), "prod", "billing");

        // Ticks at 0, 20 and 40ms; shutdown fires at 55ms.
        lister
            .run_periodic(
                Duration::from_millis(20),
                tokio::time::sleep(Duration::from_millis(55)),
            )
            .await;

        assert_eq!(source.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_periodic_keeps_going_after_query_error() {
        let source = Arc::new(RecordingSource {
            fail: true,
            ..Default::default()
        });
        let lister = PodLister::new(source.clone(), "prod", "billing");

        lister
            .run_periodic(
                Duration::from_secs(10),
                tokio::time::sleep(Duration::from_secs(25)),
            )
            .await;

        assert_eq!(source.calls.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_app_selector() {
        assert_eq!(app_selector("billing"), "app=billing");
    }

    #[test]
    fn test_from_config() {
        let config = GateConfig {
            service_name: "billing".to_string(),
            namespace: "prod".to_string(),
            ..Default::default()
        };
        let lister = PodLister::from_config(Arc::new(RecordingSource::default()), &config);

        assert_eq!(lister.label_selector(), config.label_selector());
        assert_eq!(lister.namespace, "prod");
    }
}
