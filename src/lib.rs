//! # waypost
//!
//! **waypost** is a small, synchronous HTTP request router and dispatcher with a
//! composable middleware pipeline. It maps path patterns such as
//! `/sum/{a:int}/{b:int}` to handlers, extracts typed path parameters,
//! enforces per-route method policies and funnels every failure through a
//! single exception handler.
//!
//! ## Overview
//!
//! waypost does not open sockets. A hosting transport (any HTTP server, a test
//! harness, the bundled CLI) hands it a request and gets a response back; the
//! built [`Application`] is `Send + Sync` and can be called from as many
//! threads as the host likes.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, the route table and path matching
//! - **[`handlers`]** - Plain handlers, per-verb resources and their wrapper
//! - **[`dispatcher`]** - Resolution, method policy, invocation and the
//!   exception policy
//! - **[`middleware`]** - The [`Service`](middleware::Service) contract,
//!   `before`/`after` hooks and the stock links (tracing, metrics, request
//!   ids, panic catching)
//! - **[`server`]** - Request/response types and the [`Application`]
//!   composition root
//! - **[`logging`]** / **[`runtime_config`]** - Host-side configuration
//! - **[`cli`]** - The `waypost` binary: route listing and one-shot calls
//!   against a demo application
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host
//!     participant App as Application
//!     participant MW as Middleware links
//!     participant Disp as Dispatcher
//!     participant Router
//!     participant H as Handler
//!     participant Exc as Exception handler
//!
//!     Host->>App: handle(http::Request)
//!     App->>MW: outermost link
//!     MW->>MW: before hooks (outer to inner)
//!     MW->>Disp: handle(&mut Request)
//!     Disp->>Router: match_path(path)
//!     alt no route
//!         Router-->>Disp: None
//!         Disp-->>MW: 404 "Not found."
//!     else route matched
//!         Router-->>Disp: RouteMatch + PathParams
//!         alt verb not served
//!             Disp->>Exc: MethodNotAllowed
//!         else verb served
//!             Disp->>H: call(req, res, params)
//!             H-->>Disp: Ok / Err
//!             Disp->>Exc: on Err
//!         end
//!         Disp-->>MW: Response
//!     end
//!     MW->>MW: after hooks (inner to outer)
//!     MW-->>App: Response
//!     App-->>Host: http::Response
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use waypost::{Application, PathParams, Request, Response};
//!
//! let mut app = Application::builder();
//! app.add_route("/hello/{name}", |_req: &Request, res: &mut Response, p: &PathParams| {
//!     res.set_text(format!("Hello {}", p.get_str("name").unwrap_or("?")));
//!     Ok(())
//! })
//! .unwrap();
//! app.add_route("/sum/{a:int}/{b:int}", |_req: &Request, res: &mut Response, p: &PathParams| {
//!     let sum = p.get_int("a").unwrap_or(0) + p.get_int("b").unwrap_or(0);
//!     res.set_text(sum.to_string());
//!     Ok(())
//! })
//! .unwrap();
//! let app = app.build();
//!
//! let res = app.handle_request(Request::new(Method::GET, "/sum/3/4")).unwrap();
//! assert_eq!(res.text(), "7");
//!
//! let res = app.handle_request(Request::new(Method::GET, "/nowhere")).unwrap();
//! assert_eq!(res.status, 404);
//! assert_eq!(res.text(), "Not found.");
//! ```
//!
//! ## Error Handling
//!
//! Handlers return `anyhow::Result<()>`. A failing handler, or a request whose
//! method the matched route does not serve, produces a
//! [`DispatchError`]. If an exception handler is registered it turns the error
//! into a response; otherwise the error propagates out of
//! [`Application::handle_request`], and [`Application::handle`] answers
//! `500 Internal Server Error`.
//!
//! ## Logging
//!
//! The library emits `tracing` events only. Hosts install a subscriber, for
//! example with [`logging::init_logging_with_config`].

pub mod cli;
pub mod dispatcher;
pub mod handlers;
pub mod ids;
pub mod logging;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::{DispatchError, MethodNotAllowedError};
pub use handlers::{Handler, HandlerRef, HandlerResult, Resource, ResourceBuilder};
pub use router::{ParamValue, PathParams, RegisterError, Verb, VerbSet};
pub use server::{AppBuilder, Application, Request, Response};
