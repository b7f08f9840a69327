use std::sync::Arc;

use http::Method;
use lee::context::handler;
use lee::engine::Engine;
use lee::middleware::{logger, recovery};
use lee::runtime_config::RuntimeConfig;
use parking_lot::Mutex;
use tracing::Level;

use tracing_util::TestTracing;

fn test_engine() -> Engine {
    Engine::with_config(RuntimeConfig {
        params_capacity: 4,
        pool_max_idle: 8,
        ..RuntimeConfig::default()
    })
}

#[test]
fn test_middleware_run_in_registration_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let mut engine = test_engine();
    for name in ["first", "second"] {
        let order = Arc::clone(&order);
        engine.use_middleware(handler(move |c| {
            order.lock().push(format!("{name}:in"));
            c.next();
            order.lock().push(format!("{name}:out"));
        }));
    }
    let route_order = Arc::clone(&order);
    engine.get("/", move |c| {
        route_order.lock().push("route".to_string());
        c.string(200, "ok");
    });

    let res = engine.serve(Method::GET, "/");
    assert_eq!(res.status, 200);
    assert_eq!(
        *order.lock(),
        vec!["first:in", "second:in", "route", "second:out", "first:out"]
    );
}

#[test]
fn test_middleware_can_short_circuit() {
    let mut engine = test_engine();
    engine.use_middleware(handler(|c| {
        if c.path().starts_with("/admin") {
            c.string(401, "unauthorized");
        } else {
            c.next();
        }
    }));
    engine.get("/admin/settings", |c| c.string(200, "settings"));
    engine.get("/public", |c| c.string(200, "public"));

    let res = engine.serve(Method::GET, "/admin/settings");
    assert_eq!(res.status, 401);
    assert_eq!(res.body_str(), "unauthorized");

    let res = engine.serve(Method::GET, "/public");
    assert_eq!(res.status, 200);
    assert_eq!(res.body_str(), "public");
}

#[test]
fn test_middleware_sees_bound_params_and_final_status() {
    let seen = Arc::new(Mutex::new(None));
    let mut engine = test_engine();
    let captured = Arc::clone(&seen);
    engine.use_middleware(handler(move |c| {
        c.next();
        *captured.lock() = Some((c.param("id").map(str::to_owned), c.response().status));
    }));
    engine.delete("/items/:id", |c| c.status(204));

    engine.serve(Method::DELETE, "/items/9");
    assert_eq!(*seen.lock(), Some((Some("9".to_string()), 204)));
}

#[test]
fn test_middleware_wraps_not_found() {
    let mut engine = test_engine();
    engine.use_middleware(handler(|c| {
        c.next();
        c.set_header("X-Wrapped", "1");
    }));

    let res = engine.serve(Method::GET, "/missing");
    assert_eq!(res.status, 404);
    assert_eq!(res.body_str(), "404 NOT FOUND: /missing\n");
    assert_eq!(res.header("x-wrapped"), Some("1"));
}

#[test]
fn test_recovery_turns_panic_into_500() {
    let tracing = TestTracing::init();
    let mut engine = test_engine();
    engine.use_middleware(recovery());
    engine.get("/boom/:id", |_| panic!("handler exploded"));
    engine.get("/fine", |c| c.string(200, "fine"));

    let res = engine.serve(Method::GET, "/boom/1");
    assert_eq!(res.status, 500);
    assert_eq!(res.body_str(), "Internal Server Error");

    let events = tracing.find("Handler panicked");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::ERROR);
    assert_eq!(events[0].fields.get("panic").map(String::as_str), Some("handler exploded"));
    assert_eq!(events[0].fields.get("path").map(String::as_str), Some("/boom/1"));

    // the engine keeps serving and the params map went back to the pool
    assert_eq!(engine.params_pool().idle(), 1);
    assert_eq!(engine.serve(Method::GET, "/fine").body_str(), "fine");
}

#[test]
fn test_recovery_formats_owned_panic_message() {
    let tracing = TestTracing::init();
    let mut engine = test_engine();
    engine.use_middleware(recovery());
    engine.get("/users/:id", |c| {
        let id = c.param("id").unwrap_or_default().to_string();
        panic!("no user {id}");
    });

    assert_eq!(engine.serve(Method::GET, "/users/42").status, 500);
    let events = tracing.find("Handler panicked");
    assert_eq!(events[0].fields.get("panic").map(String::as_str), Some("no user 42"));
}

#[test]
fn test_recovery_passes_through_without_panic() {
    let mut engine = test_engine();
    engine.use_middleware(recovery());
    engine.post("/login", |c| c.string(200, "login"));

    let res = engine.serve(Method::POST, "/login");
    assert_eq!(res.status, 200);
    assert_eq!(res.body_str(), "login");
}

#[test]
fn test_logger_records_completed_request() {
    let tracing = TestTracing::init();
    let mut engine = test_engine();
    engine.use_middleware(logger());
    engine.get("/hello/:name", |c| {
        let body = format!("hello {}", c.param("name").unwrap_or_default());
        c.string(200, body);
    });

    let res = engine.serve(Method::GET, "/hello/geektutu");
    assert_eq!(res.body_str(), "hello geektutu");
    engine.serve(Method::GET, "/nope");

    let events = tracing.find("Request completed");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].level, Level::INFO);
    assert_eq!(events[0].fields.get("method").map(String::as_str), Some("GET"));
    assert_eq!(events[0].fields.get("path").map(String::as_str), Some("/hello/geektutu"));
    assert_eq!(events[0].fields.get("status").map(String::as_str), Some("200"));
    assert!(events[0].fields.contains_key("latency_us"));
    assert_eq!(events[1].fields.get("status").map(String::as_str), Some("404"));
}

#[test]
fn test_logger_and_recovery_together() {
    let tracing = TestTracing::init();
    let mut engine = test_engine();
    engine.use_middleware(logger()).use_middleware(recovery());
    engine.get("/panic", |_| panic!("boom"));

    assert_eq!(engine.serve(Method::GET, "/panic").status, 500);

    // recovery runs inside the logger, so the logged status is the 500
    let events = tracing.find("Request completed");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].fields.get("status").map(String::as_str), Some("500"));
}
