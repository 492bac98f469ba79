//! # Handlers Module
//!
//! Application handlers come in two shapes:
//!
//! - **Plain handlers**: one callable serving every verb its route allows.
//! - **Resources**: one optional sub-handler per verb
//!   (`get`, `post`, `put`, `patch`, `delete`, `options`). A verb the resource
//!   does not implement is absent, and requests using it are rejected with
//!   `MethodNotAllowed`.
//!
//! Both are registered through [`HandlerRef`], which is what the route table
//! stores.
//!
//! ## Writing a resource
//!
//! Either implement [`Resource`] on a type, overriding only the verbs it
//! serves:
//!
//! ```rust
//! use waypost::handlers::{Handler, HandlerResult, Resource};
//! use waypost::{PathParams, Request, Response};
//!
//! fn list_books(_: &Request, res: &mut Response, _: &PathParams) -> HandlerResult {
//!     res.set_text("Books Page");
//!     Ok(())
//! }
//!
//! struct Books;
//!
//! impl Resource for Books {
//!     fn get(&self) -> Option<&dyn Handler> {
//!         Some(&list_books)
//!     }
//! }
//! ```
//!
//! or assemble one from closures with [`ResourceBuilder`].

mod types;

pub use types::{Handler, HandlerRef, HandlerResult, Resource, ResourceBuilder, VerbTable};
