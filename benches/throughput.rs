use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use waypost::handlers::HandlerRef;
use waypost::router::Router;
use waypost::{Application, PathParams, Request, Response};

const PATTERNS: &[&str] = &[
    "/",
    "/zoo/animals",
    "/zoo/animals/{id:int}",
    "/zoo/animals/{id:int}/toys/{toy_id:int}",
    "/zoo/{category}/animals/{id:int}/habitats/{habitat_id:int}/sections/{section_id:int}",
    "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}",
    "/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}",
    "/zoo/health",
];

const PATHS: &[&str] = &[
    "/zoo/animals/123",
    "/zoo/animals/123/toys/456",
    "/zoo/cats/animals/123/habitats/88/sections/5",
    "/inventory/1/feeds/2/items/3/batches/4",
    "/complex/1/2/3/4/5/6/7/8/9",
    "/zoo/health",
    "/does/not/exist",
];

fn ok(_req: &Request, res: &mut Response, _p: &PathParams) -> waypost::HandlerResult {
    res.set_text("ok");
    Ok(())
}

fn bench_route_throughput(c: &mut Criterion) {
    let mut router = Router::new();
    for pattern in PATTERNS {
        router.register(pattern, HandlerRef::plain(ok), None).unwrap();
    }

    c.bench_function("route_match", |b| {
        b.iter(|| {
            for path in PATHS {
                let res = router.match_path(black_box(path));
                black_box(&res);
            }
        })
    });
}

fn bench_dispatch_throughput(c: &mut Criterion) {
    let mut builder = Application::builder();
    for pattern in PATTERNS {
        builder.add_route(pattern, ok).unwrap();
    }
    let app = builder.build();

    c.bench_function("dispatch", |b| {
        b.iter(|| {
            for path in PATHS {
                let res = app.handle_request(Request::new(Method::GET, black_box(path)));
                black_box(&res);
            }
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_dispatch_throughput);
criterion_main!(benches);
