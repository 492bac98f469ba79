//! # Router Module
//!
//! The router owns the route table and resolves a request path to the route
//! registered for it.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling pattern text such as `/sum/{a:int}/{b:int}` at registration
//! - Refusing duplicate or malformed patterns
//! - Matching request paths against the table in registration order
//! - Extracting typed path parameters from the matched path
//!
//! ## Pattern syntax
//!
//! Segments are separated by `/`. A segment written `{name}` binds a string
//! parameter, `{name:int}` binds an `i64` and rejects non-numeric segments for
//! that candidate route (matching falls through to later routes). Every other
//! segment is a literal and must match byte-for-byte. A placeholder never
//! matches an empty segment and never spans a `/`.
//!
//! ## Example
//!
//! ```rust
//! use waypost::handlers::HandlerRef;
//! use waypost::router::Router;
//!
//! let mut router = Router::new();
//! let handler = HandlerRef::plain(|_req: &waypost::Request,
//!                                  res: &mut waypost::Response,
//!                                  _p: &waypost::PathParams| {
//!     res.set_text("hi");
//!     Ok(())
//! });
//! router.register("/sum/{a:int}/{b:int}", handler, None).unwrap();
//!
//! let m = router.match_path("/sum/3/4").unwrap();
//! assert_eq!(m.path_params.get_int("a"), Some(3));
//! assert!(router.match_path("/sum/x/4").is_none());
//! ```
//!
//! ## Concurrency
//!
//! `match_path` takes `&self` and never mutates, so a fully registered
//! `Router` can be shared across threads without locking.

mod core;
mod error;
mod pattern;
#[cfg(test)]
mod tests;
mod verb;

pub use core::{Route, RouteMatch, Router};
pub use error::RegisterError;
pub use pattern::{ParamKind, ParamValue, PathParams, PathPattern, Segment, MAX_INLINE_PARAMS};
pub use verb::{Verb, VerbSet};
