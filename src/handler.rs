//! Host-facing handler interface
//!
//! A host adapter turns its native request into an `http::Request<Bytes>`,
//! calls [`Handler::handle`], and writes back whatever comes out. `None`
//! means the handler wrote no response at all.

use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, Response};
use std::future::Future;

/// Outcome of handling a request
pub type Reply = Option<Response<Bytes>>;

#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, req: Request<Bytes>) -> Reply;
}

/// Handler backed by an async closure
pub struct HandlerFn<F> {
    f: F,
}

/// Wrap an async closure as a [`Handler`]
///
/// ```ignore
/// let next = handler_fn(|_req| async { Some(Response::new(Bytes::from_static(b"ok"))) });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Reply> + Send,
{
    HandlerFn { f }
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Request<Bytes>) -> Fut + Send + Sync,
    Fut: Future<Output = Reply> + Send,
{
    async fn handle(&self, req: Request<Bytes>) -> Reply {
        (self.f)(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[tokio::test]
    async fn test_handler_fn_passes_request() {
        let handler = handler_fn(|req: Request<Bytes>| async move {
            let mut res = Response::new(req.into_body());
            *res.status_mut() = StatusCode::ACCEPTED;
            Some(res)
        });

        let reply = handler
            .handle(Request::new(Bytes::from_static(b"ping")))
            .await
            .expect("Should reply");

        assert_eq!(reply.status(), StatusCode::ACCEPTED);
        assert_eq!(reply.body().as_ref(), b"ping");
    }
}
