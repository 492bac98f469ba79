use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

use super::Service;
use crate::dispatcher::DispatchError;
use crate::server::{Request, Response};

/// Turns a panic in the wrapped middleware links into
/// `DispatchError::Handler`.
///
/// Handler panics never get this far: the dispatcher converts them itself and
/// hands them to the exception handler. What is left for this link are panics
/// raised by middleware hooks or by the exception handler. Those travel
/// outward like any other unhandled failure.
pub struct CatchPanic {
    inner: Box<dyn Service>,
}

impl CatchPanic {
    /// Factory for `AppBuilder::add_middleware`.
    pub fn wrap(inner: Box<dyn Service>) -> Box<dyn Service> {
        Box::new(Self { inner })
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

impl Service for CatchPanic {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        match catch_unwind(AssertUnwindSafe(|| self.inner.handle(req))) {
            Ok(result) => result,
            Err(payload) => Err(DispatchError::Handler(anyhow::anyhow!(
                "middleware panicked: {}",
                panic_message(payload.as_ref())
            ))),
        }
    }
}
