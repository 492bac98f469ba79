//! Router core module - the route table and the matching hot path.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use tracing::{debug, info, trace};

use super::error::RegisterError;
use super::pattern::{PathParams, PathPattern};
use super::verb::VerbSet;
use crate::handlers::HandlerRef;

/// A registered route: compiled pattern, handler and verb policy.
///
/// Immutable once it is in the table.
#[derive(Clone)]
pub struct Route {
    pattern: PathPattern,
    handler: HandlerRef,
    allowed: VerbSet,
}

impl Route {
    #[must_use]
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }

    /// Verbs a plain handler accepts. For resources this is the set of verbs
    /// the resource implements.
    #[must_use]
    pub fn allowed(&self) -> VerbSet {
        self.allowed
    }
}

/// Result of successfully matching a request path to a route
#[derive(Clone)]
pub struct RouteMatch<'a> {
    /// The matched route
    pub route: &'a Route,
    /// Typed parameters bound by the pattern's placeholders
    pub path_params: PathParams,
}

impl RouteMatch<'_> {
    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.route.handler
    }

    #[must_use]
    pub fn allowed(&self) -> VerbSet {
        self.route.allowed
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.route.pattern.as_str()
    }
}

/// Ordered route table.
///
/// Insertion order is match precedence: the first registered pattern that
/// matches a path wins, so register specific patterns before general ones
/// that would shadow them.
#[derive(Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `pattern`.
    ///
    /// `allowed` restricts the verbs a plain handler serves and defaults to all
    /// six. It is ignored for resource handlers, whose verb support comes from
    /// the methods they implement.
    ///
    /// # Errors
    ///
    /// * [`RegisterError::DuplicateRoute`] if the exact pattern text is taken;
    ///   the existing route is left untouched.
    /// * [`RegisterError::InvalidPattern`] if the pattern does not compile.
    pub fn register(
        &mut self,
        pattern: &str,
        handler: HandlerRef,
        allowed: Option<VerbSet>,
    ) -> Result<(), RegisterError> {
        if self.routes.iter().any(|r| r.pattern.as_str() == pattern) {
            return Err(RegisterError::DuplicateRoute {
                pattern: pattern.to_owned(),
            });
        }

        let compiled = PathPattern::parse(pattern)?;
        let allowed = match &handler {
            HandlerRef::Plain(_) => allowed.unwrap_or_default(),
            HandlerRef::Resource(resource) => resource.supported_verbs(),
        };

        debug!(
            pattern = %compiled,
            kind = handler.kind(),
            allowed = ?allowed,
            params = ?compiled.param_names().collect::<Vec<_>>(),
            precedence = self.routes.len(),
            "Route registered"
        );

        self.routes.push(Route {
            pattern: compiled,
            handler,
            allowed,
        });
        Ok(())
    }

    /// Match a request path against the table in registration order.
    ///
    /// Returns `None` if no pattern matches; an integer placeholder that sees a
    /// non-integer segment simply rejects that candidate and matching moves on.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        for route in &self.routes {
            if let Some(path_params) = route.pattern.matches(path) {
                debug!(
                    path = %path,
                    route_pattern = %route.pattern,
                    path_params = ?path_params,
                    "Route matched"
                );
                return Some(RouteMatch { route, path_params });
            }
        }

        trace!(path = %path, routes_count = self.routes.len(), "No route matched");
        None
    }

    /// Pattern text of every route, in precedence order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.pattern.as_str()).collect()
    }

    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log the whole table at info level.
    pub fn dump_routes(&self) {
        info!(routes_count = self.routes.len(), "Routing table");
        for (idx, route) in self.routes.iter().enumerate() {
            info!(
                precedence = idx,
                pattern = %route.pattern,
                kind = route.handler.kind(),
                allowed = ?route.allowed,
                "Route"
            );
        }
    }
}
