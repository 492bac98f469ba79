use std::collections::HashMap;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Extensions, Method};
use serde::de::DeserializeOwned;

use crate::router::PathParams;

/// An inbound request as seen by middleware and handlers.
///
/// Created once per call by the entry point. Middleware pre-hooks receive it
/// mutably; handlers only ever get `&Request`. `path_params` is filled in by
/// the dispatcher when a route matches.
#[derive(Debug, Clone, Default)]
pub struct Request {
    /// HTTP method (GET, POST, etc.)
    pub method: Method,
    /// Request path, without the query string
    pub path: String,
    /// Raw query string, without the leading `?`
    pub query: Option<String>,
    /// HTTP headers
    pub headers: HeaderMap,
    /// Raw request body
    pub body: Vec<u8>,
    /// Parameters bound by the matched route pattern
    pub path_params: PathParams,
    /// Typed per-request state attached by middleware
    pub extensions: Extensions,
}

impl Request {
    /// Create a request for `method` and `target`.
    ///
    /// `target` may carry a query string (`/users?limit=10`); it is split off
    /// into [`Request::query`].
    #[must_use]
    pub fn new(method: Method, target: &str) -> Self {
        let (path, query) = match target.split_once('?') {
            Some((p, q)) => (p.to_owned(), Some(q.to_owned())),
            None => (target.to_owned(), None),
        };
        Self {
            method,
            path,
            query,
            ..Self::default()
        }
    }

    /// Builder-style header insertion. Invalid names or values are skipped.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value by name (case-insensitive), if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Path parameter by name.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&crate::router::ParamValue> {
        self.path_params.get(name)
    }

    /// Decoded query string parameters. Later duplicates win.
    #[must_use]
    pub fn query_params(&self) -> HashMap<String, String> {
        self.query
            .as_deref()
            .map(|q| {
                url::form_urlencoded::parse(q.as_bytes())
                    .map(|(k, v)| (k.into_owned(), v.into_owned()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cookie value from the `Cookie` header.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.header("cookie")?.split(';').find_map(|pair| {
            let (k, v) = pair.trim().split_once('=')?;
            (k.trim() == name).then(|| v.trim())
        })
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.body)
    }

    /// Deserialize a JSON body.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Convert from an `http::Request`, keeping headers, body and extensions.
    #[must_use]
    pub fn from_http(req: http::Request<Vec<u8>>) -> Self {
        let (parts, body) = req.into_parts();
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            body,
            path_params: PathParams::new(),
            extensions: parts.extensions,
        }
    }
}

impl From<http::Request<Vec<u8>>> for Request {
    fn from(req: http::Request<Vec<u8>>) -> Self {
        Request::from_http(req)
    }
}
