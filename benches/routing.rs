use criterion::{criterion_group, criterion_main, Criterion};
use http::Method;
use lee::context::handler;
use lee::engine::Engine;
use lee::router::Router;
use lee::runtime_config::RuntimeConfig;
use std::hint::black_box;

fn demo_router() -> Router {
    let mut router = Router::new();
    for pattern in [
        "/",
        "/zoo/animals",
        "/zoo/animals/:id",
        "/zoo/animals/:id/toys/:toy_id",
        "/zoo/:category/animals/:id/habitats/:habitat_id/sections/:section_id",
        "/complex/:a/:b/:c/:d/:e/:f/:g/:h/:i",
        "/assets/*filepath",
    ] {
        router.add_route(Method::GET, pattern, handler(|_| {}));
    }
    router.add_route(
        Method::POST,
        "/inventory/:warehouse_id/feeds/:feed_id/items/:item_id/batches/:batch_id",
        handler(|_| {}),
    );
    router
}

fn bench_static_routes(c: &mut Criterion) {
    let mut router = Router::new();
    for i in 0..100 {
        router.add_route(Method::GET, &format!("/static/route{i}"), handler(|_| {}));
    }
    c.bench_function("static_route_match", |b| {
        b.iter(|| black_box(router.get_route(&Method::GET, black_box("/static/route57"))))
    });
}

fn bench_route_throughput(c: &mut Criterion) {
    let router = demo_router();
    let test_paths = [
        (Method::GET, "/zoo/animals/123"),
        (Method::GET, "/zoo/animals/123/toys/456"),
        (Method::GET, "/zoo/cats/animals/123/habitats/88/sections/5"),
        (Method::POST, "/inventory/1/feeds/2/items/3/batches/4"),
        (Method::GET, "/complex/1/2/3/4/5/6/7/8/9"),
    ];
    c.bench_function("dynamic_route_match", |b| {
        b.iter(|| {
            for (method, path) in &test_paths {
                black_box(router.get_route(method, path));
            }
        })
    });
}

fn bench_catch_all(c: &mut Criterion) {
    let router = demo_router();
    c.bench_function("catch_all_route_match", |b| {
        b.iter(|| black_box(router.get_route(&Method::GET, black_box("/assets/js/vendor/app.min.js"))))
    });
}

fn bench_engine_serve(c: &mut Criterion) {
    let mut engine = Engine::with_config(RuntimeConfig::default());
    engine.get("/users/:id/posts/:pid", |c| {
        let body = format!(
            "{}/{}",
            c.param("id").unwrap_or_default(),
            c.param("pid").unwrap_or_default()
        );
        c.string(200, body);
    });
    c.bench_function("engine_serve", |b| {
        b.iter(|| black_box(engine.serve(Method::GET, black_box("/users/42/posts/7"))))
    });
}

criterion_group!(
    benches,
    bench_static_routes,
    bench_route_throughput,
    bench_catch_all,
    bench_engine_serve
);
criterion_main!(benches);
