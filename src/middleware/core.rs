use std::sync::Arc;

use crate::dispatcher::DispatchError;
use crate::server::{Request, Response};

/// The request-handling contract shared by the dispatcher and every
/// middleware link.
pub trait Service: Send + Sync {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError>;
}

impl<S: Service + ?Sized> Service for Box<S> {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        (**self).handle(req)
    }
}

impl<S: Service + ?Sized> Service for Arc<S> {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        (**self).handle(req)
    }
}

/// Pre/post hooks around an inner service. Both default to no-ops.
pub trait Middleware: Send + Sync {
    fn before(&self, _req: &mut Request) {}
    fn after(&self, _req: &Request, _res: &mut Response) {}
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn before(&self, req: &mut Request) {
        (**self).before(req);
    }
    fn after(&self, req: &Request, res: &mut Response) {
        (**self).after(req, res);
    }
}

/// A middleware link: runs `before`, delegates to the wrapped service, then
/// runs `after` on the populated response.
///
/// If the inner service fails, `after` is skipped and the error propagates
/// outward untouched.
pub struct Layered<M> {
    middleware: M,
    inner: Box<dyn Service>,
}

impl<M: Middleware> Layered<M> {
    pub fn new(middleware: M, inner: Box<dyn Service>) -> Self {
        Self { middleware, inner }
    }
}

impl<M: Middleware> Service for Layered<M> {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        self.middleware.before(req);
        let mut res = self.inner.handle(req)?;
        self.middleware.after(req, &mut res);
        Ok(res)
    }
}

/// A function producing the next link from the current chain head.
pub type MiddlewareFactory = Box<dyn FnOnce(Box<dyn Service>) -> Box<dyn Service>>;

/// Ordered stack of middleware links around an innermost service.
///
/// Each [`Pipeline::add`] consumes the pipeline and wraps the current head, so
/// the most recently added link is outermost: it sees the request first and
/// the response last. A factory that panics consumes the pipeline with it.
pub struct Pipeline {
    head: Box<dyn Service>,
    depth: usize,
}

impl Pipeline {
    pub fn new(innermost: Box<dyn Service>) -> Self {
        Self {
            head: innermost,
            depth: 0,
        }
    }

    #[must_use]
    pub fn add<F>(self, factory: F) -> Self
    where
        F: FnOnce(Box<dyn Service>) -> Box<dyn Service>,
    {
        Self {
            head: factory(self.head),
            depth: self.depth + 1,
        }
    }

    /// Number of links wrapped around the innermost service.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[must_use]
    pub fn into_head(self) -> Box<dyn Service> {
        self.head
    }
}

impl Service for Pipeline {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        self.head.handle(req)
    }
}
