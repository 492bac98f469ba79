//! # Middleware Module
//!
//! Middleware links wrap the dispatcher in an ownership chain. Every link
//! implements [`Service`], the same contract as the dispatcher, and owns the
//! next-inner link.
//!
//! There are two ways to write one:
//!
//! - Implement [`Middleware`] (`before` / `after` hooks) and install it with
//!   `AppBuilder::add_layer`, which wraps it in [`Layered`].
//! - Implement [`Service`] directly around a `Box<dyn Service>` when the link
//!   needs to see errors or control the inner call, and install it with
//!   `AppBuilder::add_middleware`.
//!
//! ## Ordering
//!
//! The most recently added link is outermost. For links added as `[A, B]`:
//!
//! ```text
//! B.before -> A.before -> dispatch -> A.after -> B.after
//! ```

mod core;
mod metrics;
mod panic;
mod request_id;
mod reverse;
mod tracing;

pub use core::{Layered, Middleware, MiddlewareFactory, Pipeline, Service};
pub use metrics::MetricsMiddleware;
pub use panic::CatchPanic;
pub(crate) use panic::panic_message;
pub use request_id::RequestIdMiddleware;
pub use reverse::ReverseBody;
pub use tracing::TracingMiddleware;
