//! The demo application served by the `waypost` binary.

use std::sync::Arc;

use http::StatusCode;

use crate::handlers::{HandlerResult, ResourceBuilder};
use crate::middleware::{MetricsMiddleware, ReverseBody};
use crate::runtime_config::RuntimeConfig;
use crate::{Application, DispatchError, PathParams, Request, Response};

fn home(_req: &Request, res: &mut Response, _params: &PathParams) -> HandlerResult {
    res.set_text("Hello from the HOME page");
    Ok(())
}

fn about(_req: &Request, res: &mut Response, _params: &PathParams) -> HandlerResult {
    res.set_text("Hello from the ABOUT page");
    Ok(())
}

fn greeting(_req: &Request, res: &mut Response, params: &PathParams) -> HandlerResult {
    let name = params
        .get_str("name")
        .ok_or_else(|| anyhow::anyhow!("missing path parameter: name"))?;
    res.set_text(format!("Hello, {name}"));
    Ok(())
}

fn sum(_req: &Request, res: &mut Response, params: &PathParams) -> HandlerResult {
    let (Some(a), Some(b)) = (params.get_int("num_1"), params.get_int("num_2")) else {
        anyhow::bail!("missing integer path parameters");
    };
    let total = a
        .checked_add(b)
        .ok_or_else(|| anyhow::anyhow!("{a} + {b} overflows"))?;
    res.set_text(format!("{a} + {b} = {total}"));
    Ok(())
}

/// Dumps what the router saw: method, path, query and sorted headers.
fn environ(req: &Request, res: &mut Response, _params: &PathParams) -> HandlerResult {
    let mut lines = vec![
        format!("method: {}", req.method),
        format!("path: {}", req.path),
        format!("query: {}", req.query.as_deref().unwrap_or("")),
    ];
    let mut headers: Vec<String> = req
        .headers
        .iter()
        .map(|(k, v)| format!("{k}: {}", String::from_utf8_lossy(v.as_bytes())))
        .collect();
    headers.sort();
    lines.extend(headers);
    res.set_text(lines.join("\n"));
    Ok(())
}

fn fail(_req: &Request, _res: &mut Response, _params: &PathParams) -> HandlerResult {
    anyhow::bail!("this route always fails")
}

/// Turns dispatch errors into responses whose body is the error text.
fn exception_handler(_req: &Request, res: &mut Response, err: &DispatchError) {
    let status = if err.is_method_not_allowed() {
        StatusCode::METHOD_NOT_ALLOWED
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    res.set_status(status);
    res.set_text(err.to_string());
}

/// Build the demo application.
///
/// Stock middleware follows `config`; `reverse` adds [`ReverseBody`] as the
/// outermost link. Returns the metrics collector when metrics are enabled.
///
/// # Errors
///
/// Fails if a route cannot be registered or the middleware settings are
/// invalid.
pub fn demo_app(
    config: &RuntimeConfig,
    reverse: bool,
) -> anyhow::Result<(Application, Option<Arc<MetricsMiddleware>>)> {
    let mut app = Application::builder();

    app.add_route("/home", home)?
        .add_route("/about", about)?
        .add_route("/hello/{name}", greeting)?
        .add_route("/sum/{num_1:int}/{num_2:int}", sum)?
        .add_handler(
            "/book",
            ResourceBuilder::new()
                .get(|_req: &Request, res: &mut Response, _p: &PathParams| {
                    res.set_text("Books Page");
                    Ok(())
                })
                .post(|_req: &Request, res: &mut Response, _p: &PathParams| {
                    res.set_text("Endpoint to create a book");
                    Ok(())
                })
                .build(),
            None,
        )?
        .add_route("/yolo", |_req: &Request, res: &mut Response, _p: &PathParams| {
            res.set_text("YOLO");
            Ok(())
        })?
        .add_route("/yolo1", |_req: &Request, res: &mut Response, _p: &PathParams| {
            res.set_text("YOLO1");
            Ok(())
        })?
        .add_route("/environ", environ)?
        .add_route("/fail", fail)?;

    app.set_exception_handler(exception_handler);

    let metrics = app.with_config(config)?;
    if reverse {
        app.add_layer(ReverseBody);
    }

    Ok((app.build(), metrics))
}
