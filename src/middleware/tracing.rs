use std::time::Instant;

use tracing::{field, info, info_span, warn};

use super::Service;
use crate::dispatcher::DispatchError;
use crate::ids::RequestId;
use crate::server::{Request, Response};

/// Opens an info span per request and logs its outcome.
///
/// Implemented as a full [`Service`] link rather than hooks so the span stays
/// entered for the whole inner call and failed requests are logged too. When a
/// [`RequestIdMiddleware`](super::RequestIdMiddleware) runs outside this link,
/// the request id is recorded on the span.
pub struct TracingMiddleware {
    inner: Box<dyn Service>,
}

impl TracingMiddleware {
    /// Factory for `AppBuilder::add_middleware`.
    pub fn wrap(inner: Box<dyn Service>) -> Box<dyn Service> {
        Box::new(Self { inner })
    }
}

impl Service for TracingMiddleware {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        let span = info_span!(
            "request",
            method = %req.method,
            path = %req.path,
            request_id = field::Empty,
            status = field::Empty,
        );
        if let Some(id) = req.extensions.get::<RequestId>() {
            span.record("request_id", field::display(id));
        }
        let _guard = span.enter();
        let start = Instant::now();

        let result = self.inner.handle(req);
        let latency_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        match &result {
            Ok(res) => {
                span.record("status", res.status.as_u16());
                info!(status = res.status.as_u16(), latency_us, "Request completed");
            }
            Err(err) => {
                warn!(
                    error = %err,
                    method_not_allowed = err.is_method_not_allowed(),
                    latency_us,
                    "Request failed"
                );
            }
        }
        result
    }
}
