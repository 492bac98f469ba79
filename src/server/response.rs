use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;

/// The response being built for a request.
///
/// Starts as `200 OK` with no headers and an empty body; handlers and
/// middleware mutate it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code
    pub status: StatusCode,
    /// HTTP response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The fixed response for a path no route matches.
    #[must_use]
    pub fn not_found() -> Self {
        let mut res = Self::default();
        res.status = StatusCode::NOT_FOUND;
        res.set_text("Not found.");
        res
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Replace the body with UTF-8 text.
    ///
    /// Sets `content-type: text/plain; charset=utf-8` unless a content type was
    /// already chosen.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.body = text.into().into_bytes();
        if !self.headers.contains_key(CONTENT_TYPE) {
            self.headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static("text/plain; charset=utf-8"),
            );
        }
    }

    /// Replace the body with serialized JSON and set `content-type`.
    pub fn set_json<T: Serialize>(&mut self, value: &T) -> Result<(), serde_json::Error> {
        self.body = serde_json::to_vec(value)?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: &str) -> anyhow::Result<()> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    #[must_use]
    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let mut res = http::Response::new(self.body);
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}
