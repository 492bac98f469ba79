use std::fmt;
use std::sync::Arc;

use crate::router::{PathParams, Verb, VerbSet};
use crate::server::{Request, Response};

/// Result of running a handler. Any error is opaque to the core and is routed
/// through the application's exception handler.
pub type HandlerResult = Result<(), anyhow::Error>;

/// A callable that serves a request by mutating the response.
pub trait Handler: Send + Sync {
    fn call(&self, req: &Request, res: &mut Response, params: &PathParams) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync,
{
    fn call(&self, req: &Request, res: &mut Response, params: &PathParams) -> HandlerResult {
        self(req, res, params)
    }
}

/// A capability set with one optional sub-handler per verb.
///
/// Every method defaults to `None` (verb not supported). Dispatch picks the
/// sub-handler through [`Resource::handler_for`], an explicit match on
/// [`Verb`].
pub trait Resource: Send + Sync {
    fn get(&self) -> Option<&dyn Handler> {
        None
    }
    fn post(&self) -> Option<&dyn Handler> {
        None
    }
    fn put(&self) -> Option<&dyn Handler> {
        None
    }
    fn patch(&self) -> Option<&dyn Handler> {
        None
    }
    fn delete(&self) -> Option<&dyn Handler> {
        None
    }
    fn options(&self) -> Option<&dyn Handler> {
        None
    }

    fn handler_for(&self, verb: Verb) -> Option<&dyn Handler> {
        match verb {
            Verb::Get => self.get(),
            Verb::Post => self.post(),
            Verb::Put => self.put(),
            Verb::Patch => self.patch(),
            Verb::Delete => self.delete(),
            Verb::Options => self.options(),
        }
    }

    /// Verbs this resource implements.
    fn supported_verbs(&self) -> VerbSet {
        Verb::ALL
            .into_iter()
            .filter(|v| self.handler_for(*v).is_some())
            .collect()
    }
}

/// Sub-handlers indexed by verb; the resource produced by [`ResourceBuilder`].
#[derive(Default)]
pub struct VerbTable {
    slots: [Option<Box<dyn Handler>>; 6],
}

impl VerbTable {
    fn slot(&self, verb: Verb) -> Option<&dyn Handler> {
        self.slots[verb as usize].as_deref()
    }
}

impl Resource for VerbTable {
    fn get(&self) -> Option<&dyn Handler> {
        self.slot(Verb::Get)
    }
    fn post(&self) -> Option<&dyn Handler> {
        self.slot(Verb::Post)
    }
    fn put(&self) -> Option<&dyn Handler> {
        self.slot(Verb::Put)
    }
    fn patch(&self) -> Option<&dyn Handler> {
        self.slot(Verb::Patch)
    }
    fn delete(&self) -> Option<&dyn Handler> {
        self.slot(Verb::Delete)
    }
    fn options(&self) -> Option<&dyn Handler> {
        self.slot(Verb::Options)
    }
}

/// Assemble a resource from closures, one per verb.
///
/// ```rust
/// use waypost::handlers::ResourceBuilder;
///
/// let book = ResourceBuilder::new()
///     .get(|_, res, _| { res.set_text("Books Page"); Ok(()) })
///     .post(|_, res, _| { res.set_text("Endpoint to create a book"); Ok(()) })
///     .build();
/// assert_eq!(book.kind(), "resource");
/// ```
#[derive(Default)]
pub struct ResourceBuilder {
    table: VerbTable,
}

macro_rules! verb_setter {
    ($name:ident, $verb:expr) => {
        #[must_use]
        pub fn $name<F>(self, handler: F) -> Self
        where
            F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
        {
            self.on($verb, handler)
        }
    };
}

impl ResourceBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the sub-handler for `verb`, replacing any earlier one.
    #[must_use]
    pub fn on<F>(mut self, verb: Verb, handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        self.table.slots[verb as usize] = Some(Box::new(handler));
        self
    }

    verb_setter!(get, Verb::Get);
    verb_setter!(post, Verb::Post);
    verb_setter!(put, Verb::Put);
    verb_setter!(patch, Verb::Patch);
    verb_setter!(delete, Verb::Delete);
    verb_setter!(options, Verb::Options);

    #[must_use]
    pub fn build(self) -> HandlerRef {
        HandlerRef::Resource(Arc::new(self.table))
    }
}

/// What a route points at.
#[derive(Clone)]
pub enum HandlerRef {
    Plain(Arc<dyn Handler>),
    Resource(Arc<dyn Resource>),
}

impl HandlerRef {
    /// Wrap a function or closure as a plain handler.
    pub fn plain<F>(handler: F) -> Self
    where
        F: Fn(&Request, &mut Response, &PathParams) -> HandlerResult + Send + Sync + 'static,
    {
        HandlerRef::Plain(Arc::new(handler))
    }

    /// Wrap a [`Resource`] implementation.
    pub fn resource<R: Resource + 'static>(resource: R) -> Self {
        HandlerRef::Resource(Arc::new(resource))
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerRef::Plain(_) => "plain",
            HandlerRef::Resource(_) => "resource",
        }
    }
}

impl fmt::Debug for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerRef::Plain(_) => f.write_str("HandlerRef::Plain(..)"),
            HandlerRef::Resource(r) => write!(f, "HandlerRef::Resource({:?})", r.supported_verbs()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    struct Books;

    fn list_books(_: &Request, res: &mut Response, _: &PathParams) -> HandlerResult {
        res.set_text("Books Page");
        Ok(())
    }

    impl Resource for Books {
        fn get(&self) -> Option<&dyn Handler> {
            Some(&list_books)
        }
    }

    #[test]
    fn test_trait_resource_defaults_are_absent() {
        let books = Books;
        assert!(books.handler_for(Verb::Get).is_some());
        assert!(books.handler_for(Verb::Put).is_none());
        assert_eq!(books.supported_verbs(), VerbSet::from([Verb::Get]));
    }

    #[test]
    fn test_builder_resource_invokes_sub_handler() {
        let table = ResourceBuilder::new()
            .post(|_, res, _| {
                res.set_text("created");
                Ok(())
            })
            .table;
        let req = Request::new(Method::POST, "/book");
        let mut res = Response::default();
        table
            .handler_for(Verb::Post)
            .unwrap()
            .call(&req, &mut res, &PathParams::new())
            .unwrap();
        assert_eq!(res.text(), "created");
        assert!(table.handler_for(Verb::Get).is_none());
    }

    #[test]
    fn test_later_registration_replaces_verb() {
        let table = ResourceBuilder::new()
            .get(|_, res, _| {
                res.set_text("first");
                Ok(())
            })
            .on(Verb::Get, |_, res, _| {
                res.set_text("second");
                Ok(())
            })
            .table;
        let mut res = Response::default();
        table
            .handler_for(Verb::Get)
            .unwrap()
            .call(&Request::default(), &mut res, &PathParams::new())
            .unwrap();
        assert_eq!(res.text(), "second");
    }
}
