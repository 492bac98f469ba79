//! Dispatcher core module - resolve, invoke, intercept.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::{debug, error};

use super::error::{DispatchError, MethodNotAllowedError};
use crate::handlers::{Handler, HandlerRef};
use crate::middleware::{panic_message, Service};
use crate::router::{PathParams, Router, Verb};
use crate::server::{Request, Response};

/// The single recovery point for dispatch failures.
///
/// Called with the original request, the response to mutate and the error.
/// It is expected to turn the response into a user-visible error; whatever it
/// leaves in the response is what the caller receives.
pub type ExceptionHandler = Arc<dyn Fn(&Request, &mut Response, &DispatchError) + Send + Sync>;

/// How a request resolves against the route table.
pub enum Outcome<'a> {
    /// No pattern matched the path
    NotFound,
    /// A route matched but cannot serve the method
    MethodNotAllowed(MethodNotAllowedError),
    /// The handler to invoke and the parameters bound from the path
    Resolved {
        handler: &'a dyn Handler,
        params: PathParams,
        pattern: &'a str,
    },
}

impl fmt::Debug for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NotFound => f.write_str("NotFound"),
            Outcome::MethodNotAllowed(e) => f.debug_tuple("MethodNotAllowed").field(e).finish(),
            Outcome::Resolved {
                params, pattern, ..
            } => f
                .debug_struct("Resolved")
                .field("pattern", pattern)
                .field("params", params)
                .finish_non_exhaustive(),
        }
    }
}

/// Resolves requests to handlers and invokes them.
///
/// Owns the route table for the lifetime of the application; nothing mutates
/// it once the dispatcher is built, so `handle` is safe to call from many
/// threads at once.
pub struct Dispatcher {
    router: Router,
    exception_handler: Option<ExceptionHandler>,
}

impl Dispatcher {
    #[must_use]
    pub fn new(router: Router) -> Self {
        Self {
            router,
            exception_handler: None,
        }
    }

    #[must_use]
    pub fn with_exception_handler(mut self, handler: Option<ExceptionHandler>) -> Self {
        self.exception_handler = handler;
        self
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn has_exception_handler(&self) -> bool {
        self.exception_handler.is_some()
    }

    /// Resolve a request without invoking anything.
    ///
    /// Resources are looked up by the lower-cased method name; plain handlers
    /// are checked against their allowed verbs. A method outside the six
    /// supported verbs (e.g. `HEAD`) never resolves.
    #[must_use]
    pub fn resolve(&self, req: &Request) -> Outcome<'_> {
        let Some(route_match) = self.router.match_path(&req.path) else {
            return Outcome::NotFound;
        };

        let not_allowed = || {
            Outcome::MethodNotAllowed(MethodNotAllowedError {
                method: req.method.clone(),
                path: req.path.clone(),
            })
        };

        let verb = Verb::from_method(&req.method);
        let route = route_match.route;
        let handler: &dyn Handler = match route.handler() {
            HandlerRef::Resource(resource) => {
                match verb.and_then(|v| resource.handler_for(v)) {
                    Some(h) => h,
                    None => return not_allowed(),
                }
            }
            HandlerRef::Plain(handler) => {
                if !route.allowed().allows(&req.method) {
                    return not_allowed();
                }
                handler.as_ref()
            }
        };

        Outcome::Resolved {
            handler,
            params: route_match.path_params,
            pattern: route.pattern().as_str(),
        }
    }

    /// Resolve and invoke, applying the fixed 404 and the exception policy.
    ///
    /// A handler that panics is treated like one that returned an error: the
    /// panic becomes `DispatchError::Handler` and goes to the exception
    /// handler.
    pub fn dispatch(&self, req: &mut Request) -> Result<Response, DispatchError> {
        match self.resolve(req) {
            Outcome::NotFound => {
                debug!(method = %req.method, path = %req.path, "Dispatch: not found");
                Ok(Response::not_found())
            }
            Outcome::MethodNotAllowed(err) => {
                debug!(method = %req.method, path = %req.path, "Dispatch: method not allowed");
                self.intercept(req, Response::default(), err.into())
            }
            Outcome::Resolved {
                handler,
                params,
                pattern,
            } => {
                debug!(
                    method = %req.method,
                    path = %req.path,
                    route_pattern = %pattern,
                    "Dispatch: invoking handler"
                );
                req.path_params = params;
                let req: &Request = req;
                let mut res = Response::default();
                let result = catch_unwind(AssertUnwindSafe(|| {
                    handler.call(req, &mut res, &req.path_params)
                }))
                .unwrap_or_else(|payload| {
                    let message = panic_message(payload.as_ref());
                    error!(
                        method = %req.method,
                        path = %req.path,
                        route_pattern = %pattern,
                        panic = %message,
                        "Handler panicked"
                    );
                    Err(anyhow::anyhow!("handler panicked: {message}"))
                });
                match result {
                    Ok(()) => Ok(res),
                    Err(err) => self.intercept(req, res, DispatchError::Handler(err)),
                }
            }
        }
    }

    fn intercept(
        &self,
        req: &Request,
        mut res: Response,
        err: DispatchError,
    ) -> Result<Response, DispatchError> {
        match &self.exception_handler {
            Some(on_error) => {
                on_error(req, &mut res, &err);
                Ok(res)
            }
            None => Err(err),
        }
    }
}

impl Service for Dispatcher {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        self.dispatch(req)
    }
}
