use std::fmt;

use http::Method;

/// A matched route cannot serve the request's method.
///
/// Raised when a resource lacks a sub-handler for the verb, or when a plain
/// handler's allowed set does not include it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNotAllowedError {
    /// The rejected request method
    pub method: Method,
    /// The request path
    pub path: String,
}

impl fmt::Display for MethodNotAllowedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Method not allowed: {} {}", self.method, self.path)
    }
}

impl std::error::Error for MethodNotAllowedError {}

/// Failure while serving a request.
///
/// This is what the exception handler receives and what reaches the caller of
/// the entry point when no exception handler is registered.
#[derive(Debug)]
pub enum DispatchError {
    /// The route exists but does not serve this method
    MethodNotAllowed(MethodNotAllowedError),
    /// The handler (or a middleware layer) failed; opaque to the core
    Handler(anyhow::Error),
}

impl DispatchError {
    #[must_use]
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, DispatchError::MethodNotAllowed(_))
    }

    /// The handler's own error, if this is one.
    #[must_use]
    pub fn as_handler(&self) -> Option<&anyhow::Error> {
        match self {
            DispatchError::Handler(e) => Some(e),
            DispatchError::MethodNotAllowed(_) => None,
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::MethodNotAllowed(e) => fmt::Display::fmt(e, f),
            DispatchError::Handler(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::MethodNotAllowed(_) => None,
            DispatchError::Handler(e) => e.source(),
        }
    }
}

impl From<MethodNotAllowedError> for DispatchError {
    fn from(e: MethodNotAllowedError) -> Self {
        DispatchError::MethodNotAllowed(e)
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(e: anyhow::Error) -> Self {
        DispatchError::Handler(e)
    }
}
