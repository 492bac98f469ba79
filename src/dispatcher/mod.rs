//! # Dispatcher Module
//!
//! The dispatcher sits at the innermost end of the middleware pipeline. For
//! every request it:
//!
//! 1. Matches the path against the route table
//! 2. Applies the method policy (resource verb lookup or plain allowed set)
//! 3. Invokes the resolved handler with the request, a fresh response and the
//!    bound path parameters
//! 4. Routes failures through the exception handler, if one is registered
//!
//! ## Outcomes
//!
//! | Outcome | Result |
//! |---------|--------|
//! | No route matches | `404`, body exactly `Not found.` |
//! | Route matches, verb unsupported | `DispatchError::MethodNotAllowed` |
//! | Handler returns `Err` | `DispatchError::Handler` |
//! | Handler returns `Ok` | the response it built |
//!
//! ## Error Handling
//!
//! Both error kinds are caught at the dispatcher boundary. With an exception
//! handler registered it is called with the original request, the response
//! (as the handler left it, or a fresh default for `MethodNotAllowed`) and the
//! error, and its response is returned. Without one the error is returned to
//! the caller unchanged. The dispatcher never retries or swallows errors.

mod core;
mod error;

pub use core::{Dispatcher, ExceptionHandler, Outcome};
pub use error::{DispatchError, MethodNotAllowedError};
