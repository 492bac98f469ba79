use std::sync::{Arc, Mutex};

use http::{Method, StatusCode};
use waypost::dispatcher::DispatchError;
use waypost::ids::RequestId;
use waypost::middleware::{
    CatchPanic, MetricsMiddleware, Middleware, RequestIdMiddleware, ReverseBody, Service,
    TracingMiddleware,
};
use waypost::{AppBuilder, Application, PathParams, Request, Response};

use tracing_util::TestTracing;

type Log = Arc<Mutex<Vec<String>>>;

struct Named {
    name: &'static str,
    log: Log,
}

impl Middleware for Named {
    fn before(&self, _req: &mut Request) {
        self.log.lock().unwrap().push(format!("{}.before", self.name));
    }

    fn after(&self, _req: &Request, _res: &mut Response) {
        self.log.lock().unwrap().push(format!("{}.after", self.name));
    }
}

fn base(log: &Log) -> AppBuilder {
    let mut app = Application::builder();
    let handler_log = Arc::clone(log);
    app.add_route("/home", move |_req: &Request, res: &mut Response, _p: &PathParams| {
        handler_log.lock().unwrap().push("handler".into());
        res.set_text("home");
        Ok(())
    })
    .unwrap();
    app.add_route("/fail", |_req: &Request, _res: &mut Response, _p: &PathParams| {
        anyhow::bail!("boom")
    })
    .unwrap();
    app.add_route("/panic", |_req: &Request, _res: &mut Response, _p: &PathParams| {
        panic!("handler exploded")
    })
    .unwrap();
    app
}

fn get(app: &Application, path: &str) -> Result<Response, DispatchError> {
    app.handle_request(Request::new(Method::GET, path))
}

#[test]
fn test_last_added_runs_outermost() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(Named {
        name: "A",
        log: Arc::clone(&log),
    });
    app.add_layer(Named {
        name: "B",
        log: Arc::clone(&log),
    });
    let app = app.build();

    get(&app, "/home").unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec!["B.before", "A.before", "handler", "A.after", "B.after"]
    );
}

// Ordering log carried by the request on the way in.
#[derive(Clone, Default)]
struct Trail(Vec<String>);

// Appends to the request trail before, and to the `x-trail` response header
// after.
struct Trailing(&'static str);

impl Middleware for Trailing {
    fn before(&self, req: &mut Request) {
        let mut trail = req.extensions.remove::<Trail>().unwrap_or_default();
        trail.0.push(format!("{}.before", self.0));
        req.extensions.insert(trail);
    }

    fn after(&self, _req: &Request, res: &mut Response) {
        let trail = match res.header("x-trail") {
            Some(so_far) => format!("{so_far},{}.after", self.0),
            None => format!("{}.after", self.0),
        };
        res.set_header("x-trail", &trail).unwrap();
    }
}

#[test]
fn test_ordering_carried_in_request_and_response() {
    let mut app = Application::builder();
    app.add_route("/trail", |req: &Request, res: &mut Response, _p: &PathParams| {
        let mut trail = req.extensions.get::<Trail>().cloned().unwrap_or_default();
        trail.0.push("handler".into());
        res.set_header("x-trail", &trail.0.join(","))?;
        Ok(())
    })
    .unwrap();
    app.add_layer(Trailing("A"));
    app.add_layer(Trailing("B"));
    let app = app.build();

    let res = get(&app, "/trail").unwrap();
    assert_eq!(
        res.header("x-trail"),
        Some("B.before,A.before,handler,A.after,B.after")
    );
}

#[test]
fn test_post_hooks_see_not_found_response() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(Named {
        name: "A",
        log: Arc::clone(&log),
    });
    let res = get(&app.build(), "/missing").unwrap();
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(*log.lock().unwrap(), vec!["A.before", "A.after"]);
}

#[test]
fn test_post_hooks_skipped_when_error_escapes() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(Named {
        name: "A",
        log: Arc::clone(&log),
    });
    let err = get(&app.build(), "/fail").unwrap_err();
    assert_eq!(err.to_string(), "boom");
    assert_eq!(*log.lock().unwrap(), vec!["A.before"]);
}

#[test]
fn test_post_hooks_run_after_exception_handler() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(Named {
        name: "A",
        log: Arc::clone(&log),
    });
    let handler_log = Arc::clone(&log);
    app.set_exception_handler(move |_req: &Request, res: &mut Response, err: &DispatchError| {
        handler_log.lock().unwrap().push("exception".into());
        res.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        res.set_text(err.to_string());
    });
    let res = get(&app.build(), "/fail").unwrap();
    assert_eq!(res.text(), "boom");
    assert_eq!(
        *log.lock().unwrap(),
        vec!["A.before", "exception", "A.after"]
    );
}

/// A link that answers without calling the inner service.
struct Gate {
    inner: Box<dyn Service>,
}

impl Service for Gate {
    fn handle(&self, req: &mut Request) -> Result<Response, DispatchError> {
        if req.header("authorization").is_none() {
            let mut res = Response::default();
            res.set_status(StatusCode::UNAUTHORIZED);
            return Ok(res);
        }
        self.inner.handle(req)
    }
}

#[test]
fn test_service_link_can_short_circuit() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_middleware(|inner| Box::new(Gate { inner }));
    let app = app.build();

    let res = get(&app, "/home").unwrap();
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(log.lock().unwrap().is_empty());

    let req = Request::new(Method::GET, "/home").with_header("authorization", "Bearer x");
    assert_eq!(app.handle_request(req).unwrap().text(), "home");
}

#[derive(Clone)]
struct Tenant(String);

struct TenantFromHeader;

impl Middleware for TenantFromHeader {
    fn before(&self, req: &mut Request) {
        let tenant = req.header("x-tenant").unwrap_or("public").to_owned();
        req.extensions.insert(Tenant(tenant));
    }
}

#[test]
fn test_pre_hook_state_reaches_handler() {
    let mut app = Application::builder();
    app.add_route("/whoami", |req: &Request, res: &mut Response, _p: &PathParams| {
        let tenant = req
            .extensions
            .get::<Tenant>()
            .map_or("none", |t| t.0.as_str());
        res.set_text(tenant);
        Ok(())
    })
    .unwrap();
    app.add_layer(TenantFromHeader);
    let app = app.build();

    let req = Request::new(Method::GET, "/whoami").with_header("x-tenant", "acme");
    assert_eq!(app.handle_request(req).unwrap().text(), "acme");
    assert_eq!(get(&app, "/whoami").unwrap().text(), "public");
}

#[test]
fn test_request_id_assigned_and_echoed() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(RequestIdMiddleware::default());
    let app = app.build();

    let res = get(&app, "/home").unwrap();
    let id = res.header("x-request-id").expect("request id header");
    assert!(id.parse::<RequestId>().is_ok());

    let incoming = RequestId::new().to_string();
    let req = Request::new(Method::GET, "/missing").with_header("x-request-id", &incoming);
    let res = app.handle_request(req).unwrap();
    assert_eq!(res.header("x-request-id"), Some(incoming.as_str()));
}

#[test]
fn test_request_id_custom_header() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(RequestIdMiddleware::new("X-Correlation-Id").unwrap());
    let res = get(&app.build(), "/home").unwrap();
    assert!(res.header("x-correlation-id").is_some());
    assert!(res.header("x-request-id").is_none());
    assert!(RequestIdMiddleware::new("bad header").is_err());
}

#[test]
fn test_metrics_count_requests_and_statuses() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    let metrics = Arc::new(MetricsMiddleware::new());
    app.add_layer(Arc::clone(&metrics));
    let app = app.build();

    get(&app, "/home").unwrap();
    get(&app, "/home").unwrap();
    get(&app, "/missing").unwrap();
    assert!(get(&app, "/fail").is_err());

    assert_eq!(metrics.request_count(), 3);
    assert_eq!(metrics.status_count(200), 2);
    assert_eq!(metrics.status_count(404), 1);
    assert_eq!(metrics.status_count(500), 0);

    let text = metrics.render_prometheus();
    assert!(text.contains("waypost_requests_total 3"));
    assert!(text.contains("waypost_responses_total{status=\"200\"} 2"));
    assert!(text.contains("waypost_responses_total{status=\"404\"} 1"));
}

struct Exploding;

impl Middleware for Exploding {
    fn before(&self, _req: &mut Request) {
        panic!("hook exploded")
    }
}

#[test]
fn test_handler_panic_converted_by_dispatcher() {
    let log: Log = Arc::default();
    let app = base(&log).build();

    let err = get(&app, "/panic").unwrap_err();
    assert!(!err.is_method_not_allowed());
    assert_eq!(err.to_string(), "handler panicked: handler exploded");

    // The application keeps serving afterwards.
    assert_eq!(get(&app, "/home").unwrap().text(), "home");
}

#[test]
fn test_catch_panic_converts_middleware_panic() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(Exploding);
    app.add_middleware(CatchPanic::wrap);
    let app = app.build();

    let err = get(&app, "/home").unwrap_err();
    assert!(!err.is_method_not_allowed());
    assert_eq!(err.to_string(), "middleware panicked: hook exploded");
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_tracing_middleware_logs_outcomes() {
    let tracing = TestTracing::init();
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_middleware(TracingMiddleware::wrap);
    app.add_layer(RequestIdMiddleware::default());
    let app = app.build();

    let res = get(&app, "/home").unwrap();
    let id = res.header("x-request-id").unwrap().to_owned();
    assert!(get(&app, "/fail").is_err());

    let out = tracing.output();
    assert!(out.contains("Request completed"));
    assert!(out.contains("Request failed"));
    assert!(out.contains(&id));
}

#[test]
fn test_reverse_body() {
    let log: Log = Arc::default();
    let mut app = base(&log);
    app.add_layer(ReverseBody);
    assert_eq!(get(&app.build(), "/home").unwrap().text(), "emoh");
}
