//! # Server Module
//!
//! Request and response types, and the [`Application`] composition root.
//!
//! The crate does not own a listener. A hosting transport converts its
//! requests into `http::Request<Vec<u8>>` and calls [`Application::handle`],
//! or builds a [`Request`] directly and calls [`Application::handle_request`].
//!
//! ## Lifecycle
//!
//! 1. Create an [`AppBuilder`] and register routes, resources, middleware and
//!    an optional exception handler
//! 2. Call [`AppBuilder::build`]; the route table and pipeline are frozen
//! 3. Serve requests concurrently from any number of threads

mod request;
mod response;
mod service;

pub use request::Request;
pub use response::Response;
pub use service::{AppBuilder, Application};
