use std::fmt;
use std::sync::Arc;

use http::StatusCode;
use tracing::{error, info, warn};

use crate::dispatcher::{DispatchError, Dispatcher, ExceptionHandler};
use crate::handlers::{HandlerRef, HandlerResult};
use crate::middleware::{
    CatchPanic, Layered, Middleware, MiddlewareFactory, MetricsMiddleware, Pipeline,
    RequestIdMiddleware, Service, TracingMiddleware,
};
use crate::router::{PathParams, RegisterError, Router, VerbSet};
use crate::runtime_config::{MiddlewareSettings, RuntimeConfig};

use super::{Request, Response};

/// Registration phase of an application.
///
/// Routes, middleware and the exception handler are collected here, in the
/// order they are registered, and frozen by [`AppBuilder::build`]. Nothing can
/// be registered on the resulting [`Application`].
#[derive(Default)]
pub struct AppBuilder {
    router: Router,
    middleware: Vec<MiddlewareFactory>,
    exception_handler: Option<ExceptionHandler>,
}

impl fmt::Debug for AppBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppBuilder")
            .field("routes", &self.router.len())
            .field("middleware", &self.middleware.len())
            .field("exception_handler", &self.exception_handler.is_some())
            .finish()
    }
}

impl AppBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain handler serving every verb.
    ///
    /// # Errors
    ///
    /// Fails fast with [`RegisterError`] if the pattern is already registered or
    /// malformed; the route table is left unchanged.
    pub fn add_route<F>(&mut self, pattern: &str, handler: F) -> Result<&mut Self, RegisterError>
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        self.router
            .register(pattern, HandlerRef::plain(handler), None)?;
        Ok(self)
    }

    /// Register a plain handler restricted to `verbs`.
    pub fn add_route_with_methods<F>(
        &mut self,
        pattern: &str,
        handler: F,
        verbs: impl Into<VerbSet>,
    ) -> Result<&mut Self, RegisterError>
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        self.router
            .register(pattern, HandlerRef::plain(handler), Some(verbs.into()))?;
        Ok(self)
    }

    /// Register an already wrapped handler: a resource from
    /// [`ResourceBuilder`](crate::handlers::ResourceBuilder) or
    /// [`HandlerRef::resource`], or a shared plain handler.
    pub fn add_handler(
        &mut self,
        pattern: &str,
        handler: HandlerRef,
        verbs: Option<VerbSet>,
    ) -> Result<&mut Self, RegisterError> {
        self.router.register(pattern, handler, verbs)?;
        Ok(self)
    }

    /// Register a [`Resource`](crate::handlers::Resource) implementation.
    pub fn add_resource<R>(&mut self, pattern: &str, resource: R) -> Result<&mut Self, RegisterError>
    where
        R: crate::handlers::Resource + 'static,
    {
        self.router
            .register(pattern, HandlerRef::resource(resource), None)?;
        Ok(self)
    }

    /// Add a middleware link produced from the current chain head.
    ///
    /// The most recently added link ends up outermost.
    pub fn add_middleware<F>(&mut self, factory: F) -> &mut Self
    where
        F: FnOnce(Box<dyn Service>) -> Box<dyn Service> + 'static,
    {
        self.middleware.push(Box::new(factory));
        self
    }

    /// Add a hook-style middleware, wrapped in [`Layered`].
    pub fn add_layer<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware + 'static,
    {
        self.add_middleware(move |inner| Box::new(Layered::new(middleware, inner)))
    }

    /// Set the exception handler, replacing any earlier one.
    pub fn set_exception_handler<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&Request, &mut Response, &DispatchError) + Send + Sync + 'static,
    {
        if self.exception_handler.is_some() {
            warn!("Replacing previously registered exception handler");
        }
        self.exception_handler = Some(Arc::new(handler));
        self
    }

    /// Install the stock middleware `settings` enables, from inside out:
    /// panic catching, metrics, tracing, request ids.
    ///
    /// Returns the metrics collector when metrics are enabled.
    ///
    /// # Errors
    ///
    /// Fails if the configured request-id header is not a valid header name.
    pub fn add_standard_middleware(
        &mut self,
        settings: &MiddlewareSettings,
    ) -> anyhow::Result<Option<Arc<MetricsMiddleware>>> {
        if settings.catch_panics {
            self.add_middleware(CatchPanic::wrap);
        }
        let metrics = settings.metrics.then(|| Arc::new(MetricsMiddleware::new()));
        if let Some(m) = &metrics {
            self.add_layer(Arc::clone(m));
        }
        if settings.tracing {
            self.add_middleware(TracingMiddleware::wrap);
        }
        if settings.request_id {
            self.add_layer(RequestIdMiddleware::new(&settings.request_id_header)?);
        }
        Ok(metrics)
    }

    /// Install the stock middleware enabled in `config`.
    ///
    /// See [`AppBuilder::add_standard_middleware`].
    pub fn with_config(
        &mut self,
        config: &RuntimeConfig,
    ) -> anyhow::Result<Option<Arc<MetricsMiddleware>>> {
        self.add_standard_middleware(&config.middleware)
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Freeze registration and compose the pipeline around the dispatcher.
    #[must_use]
    pub fn build(self) -> Application {
        let routes = self.router.len();
        let dispatcher = Arc::new(
            Dispatcher::new(self.router).with_exception_handler(self.exception_handler),
        );

        let pipeline = self
            .middleware
            .into_iter()
            .fold(Pipeline::new(Box::new(Arc::clone(&dispatcher))), Pipeline::add);

        info!(
            routes_count = routes,
            middleware_count = pipeline.depth(),
            exception_handler = dispatcher.has_exception_handler(),
            "Application built"
        );

        Application {
            dispatcher,
            head: pipeline.into_head(),
        }
    }
}

/// A built application: the entry point a hosting transport calls.
///
/// Immutable and `Send + Sync`; share it behind an `Arc` and call
/// [`Application::handle`] from as many threads as the host likes.
pub struct Application {
    dispatcher: Arc<Dispatcher>,
    head: Box<dyn Service>,
}

impl Application {
    #[must_use]
    pub fn builder() -> AppBuilder {
        AppBuilder::new()
    }

    /// The route table, read-only.
    #[must_use]
    pub fn router(&self) -> &Router {
        self.dispatcher.router()
    }

    /// Run a domain request through the whole pipeline.
    ///
    /// Errors not handled by the exception handler come back unchanged.
    pub fn handle_request(&self, mut req: Request) -> Result<Response, DispatchError> {
        self.head.handle(&mut req)
    }

    /// Transport boundary: `http` types in, `http` types out.
    ///
    /// An error that escapes the pipeline becomes a bare `500 Internal Server
    /// Error`.
    pub fn handle(&self, req: http::Request<Vec<u8>>) -> http::Response<Vec<u8>> {
        let req = Request::from_http(req);
        let method = req.method.clone();
        let path = req.path.clone();

        match self.handle_request(req) {
            Ok(res) => res.into_http(),
            Err(err) => {
                error!(
                    method = %method,
                    path = %path,
                    error = %err,
                    "Unhandled dispatch error"
                );
                let mut res = Response::default();
                res.status = StatusCode::INTERNAL_SERVER_ERROR;
                res.set_text("Internal Server Error");
                res.into_http()
            }
        }
    }
}

impl Service for Application {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        self.head.handle(req)
    }
}
