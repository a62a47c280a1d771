//! Header gate
//!
//! Rejects any request that lacks the configured header with a `400` and a
//! JSON body. What happens to requests that do carry it depends on
//! [`PresentAction`]: by default they go to the next handler.

use crate::config::{GateConfig, PresentAction};
use crate::handler::{Handler, Reply};
use crate::k8s::{KubePodSource, PodLister, PodSource};
use crate::{GateError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Body of a rejection response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl ErrorResponse {
    pub fn missing_header(header: &str) -> Self {
        Self {
            message: format!("Missing required header: {}", header),
        }
    }
}

/// Build the plugin handler from its configuration.
///
/// A disabled config returns `next` untouched without validating anything.
/// Otherwise the config is validated and a client is built from in-cluster
/// credentials before the gate is returned.
pub async fn new(
    config: &GateConfig,
    next: Arc<dyn Handler>,
    name: &str,
) -> Result<Arc<dyn Handler>> {
    build_with(config, next, name, connect_in_cluster).await
}

/// Same as [`new`], with the client constructor supplied by the caller.
///
/// `connect` runs at most once, and only after validation passes.
pub async fn build_with<C, Fut>(
    config: &GateConfig,
    next: Arc<dyn Handler>,
    name: &str,
    connect: C,
) -> Result<Arc<dyn Handler>>
where
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<Arc<dyn PodSource>>>,
{
    if !config.enabled {
        debug!("Plugin {} disabled, passing requests through", name);
        return Ok(next);
    }

    config.validate()?;

    let client = connect().await?;

    Ok(Arc::new(Gate::build(config, next, name, client)?))
}

async fn connect_in_cluster() -> Result<Arc<dyn PodSource>> {
    Ok(Arc::new(KubePodSource::in_cluster().await?))
}

pub struct Gate {
    name: String,
    header: String,
    service_name: String,
    data_source_url: String,
    namespace: String,
    on_present: PresentAction,
    next: Arc<dyn Handler>,
    client: Arc<dyn PodSource>,
    rejection_body: Bytes,
}

impl Gate {
    /// Construct a gate around an existing client. Ignores `enabled`.
    pub fn build(
        config: &GateConfig,
        next: Arc<dyn Handler>,
        name: &str,
        client: Arc<dyn PodSource>,
    ) -> Result<Self> {
        config.validate()?;

        let body = serde_json::to_vec(&ErrorResponse::missing_header(&config.header))
            .map_err(GateError::Serialization)?;

        info!(
            "Plugin {} gating on header {} for service {}",
            name, config.header, config.service_name
        );

        Ok(Self {
            name: name.to_string(),
            header: config.header.clone(),
            service_name: config.service_name.clone(),
            data_source_url: config.data_source_url.clone(),
            namespace: config.namespace.clone(),
            on_present: config.on_header_present,
            next,
            client,
            rejection_body: Bytes::from(body),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn data_source_url(&self) -> &str {
        &self.data_source_url
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Lister for this gate's service, sharing the gate's client
    pub fn pod_lister(&self) -> PodLister {
        PodLister::new(self.client.clone(), &self.namespace, &self.service_name)
    }

    fn has_header<B>(&self, req: &Request<B>) -> bool {
        req.headers()
            .get(self.header.as_str())
            .is_some_and(|value| !value.is_empty())
    }

    fn reject(&self) -> Response<Bytes> {
        let mut res = Response::new(self.rejection_body.clone());
        *res.status_mut() = StatusCode::BAD_REQUEST;
        res.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        res
    }
}

#[async_trait]
impl Handler for Gate {
    async fn handle(&self, req: Request<Bytes>) -> Reply {
        if !self.has_header(&req) {
            debug!(
                "{}: rejecting {} {} without header {}",
                self.name,
                req.method(),
                req.uri(),
                self.header
            );
            return Some(self.reject());
        }

        match self.on_present {
            PresentAction::Forward => self.next.handle(req).await,
            PresentAction::Drop => {
                debug!("{}: dropping {} {}", self.name, req.method(), req.uri());
                None
            }
        }
    }
}
