use http::header::{HeaderName, HeaderValue, InvalidHeaderName};

use super::Middleware;
use crate::ids::RequestId;
use crate::server::{Request, Response};

/// Assigns every request an id and echoes it on the response.
///
/// An incoming id in the configured header is reused when it is a valid ULID;
/// otherwise a new one is generated. The id is stored in request extensions
/// as a [`RequestId`].
pub struct RequestIdMiddleware {
    header: HeaderName,
}

impl Default for RequestIdMiddleware {
    fn default() -> Self {
        Self {
            header: HeaderName::from_static("x-request-id"),
        }
    }
}

impl RequestIdMiddleware {
    /// Use a custom header name instead of `x-request-id`.
    pub fn new(header: &str) -> Result<Self, InvalidHeaderName> {
        Ok(Self {
            header: HeaderName::from_bytes(header.as_bytes())?,
        })
    }

    #[must_use]
    pub fn header(&self) -> &HeaderName {
        &self.header
    }
}

impl Middleware for RequestIdMiddleware {
    fn before(&self, req: &mut Request) {
        let incoming = req.headers.get(&self.header).and_then(|v| v.to_str().ok());
        let id = RequestId::from_header_or_new(incoming);
        req.extensions.insert(id);
    }

    fn after(&self, req: &Request, res: &mut Response) {
        let Some(id) = req.extensions.get::<RequestId>() else {
            return;
        };
        if let Ok(value) = HeaderValue::from_str(&id.to_string()) {
            res.headers.insert(self.header.clone(), value);
        }
    }
}
