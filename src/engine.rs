//! Engine: a router plus global middleware and per-request resources.
//!
//! The engine is built during a single-threaded setup phase (`&mut self`) and
//! then shared read-only; [`Engine::serve`] takes `&self` and can be called
//! from any number of threads at once.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use lee::engine::Engine;
//! use lee::middleware::logger;
//!
//! let mut engine = Engine::new();
//! engine.use_middleware(logger());
//! engine.get("/hello/:name", |c| {
//!     let body = format!("hello {}", c.param("name").unwrap_or_default());
//!     c.string(200, body);
//! });
//!
//! let res = engine.serve(Method::GET, "/hello/geektutu");
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body_str(), "hello geektutu");
//!
//! let res = engine.serve(Method::GET, "/nope");
//! assert_eq!(res.status, 404);
//! ```

use std::sync::Arc;

use http::Method;
use tracing::info;

use crate::context::{handler, Context, HandlerFunc, Response};
use crate::params::ParamsPool;
use crate::router::Router;
use crate::runtime_config::RuntimeConfig;

pub struct Engine {
    router: Router,
    middlewares: Vec<HandlerFunc>,
    pool: ParamsPool,
    config: RuntimeConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine configured from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: RuntimeConfig) -> Self {
        info!(
            params_capacity = config.params_capacity,
            pool_max_idle = config.pool_max_idle,
            slow_match_us = config.slow_match.as_micros(),
            "Engine created"
        );
        Self {
            router: Router::new().with_slow_match_threshold(config.slow_match),
            middlewares: Vec::new(),
            pool: ParamsPool::new(config.pool_max_idle, config.params_capacity),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Router for direct, side-effect free lookups
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    #[must_use]
    pub fn params_pool(&self) -> &ParamsPool {
        &self.pool
    }

    /// Append a middleware; middleware run in registration order before the
    /// route handler.
    pub fn use_middleware(&mut self, middleware: HandlerFunc) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    pub fn add_route<F>(&mut self, method: Method, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        info!(method = %method, pattern = %pattern, "Route registered");
        self.router.add_route(method, pattern, handler(f));
        self
    }

    pub fn get<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::GET, pattern, f)
    }

    pub fn post<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::POST, pattern, f)
    }

    pub fn put<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PUT, pattern, f)
    }

    pub fn delete<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::DELETE, pattern, f)
    }

    pub fn patch<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::PATCH, pattern, f)
    }

    pub fn head<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::HEAD, pattern, f)
    }

    pub fn options<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        self.add_route(Method::OPTIONS, pattern, f)
    }

    /// Handle one request and return its response.
    ///
    /// The parameter map comes from the engine's pool and goes back to it when
    /// the request ends, including when a handler panics.
    pub fn serve(&self, method: Method, path: &str) -> Response {
        let mut ctx = Context::new(method, path, self.pool.checkout());
        ctx.extend_handlers(self.middlewares.iter().map(Arc::clone));
        self.router.handle(&mut ctx);
        ctx.into_response()
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("router", &self.router)
            .field("middlewares", &self.middlewares.len())
            .field("pool", &self.pool)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_engine() -> Engine {
        Engine::with_config(RuntimeConfig {
            params_capacity: 2,
            pool_max_idle: 8,
            slow_match: Duration::from_secs(1),
        })
    }

    #[test]
    fn test_method_sugar_registers_per_method() {
        let mut e = test_engine();
        e.get("/x", |c| c.string(200, "get"))
            .post("/x", |c| c.string(201, "post"))
            .put("/x", |c| c.string(200, "put"))
            .delete("/x", |c| c.string(204, ""))
            .patch("/x", |c| c.string(200, "patch"))
            .head("/x", |c| c.status(200))
            .options("/x", |c| c.status(204));

        assert_eq!(e.router().route_count(), 7);
        assert_eq!(e.serve(Method::POST, "/x").status, 201);
        assert_eq!(e.serve(Method::PATCH, "/x").body_str(), "patch");
        assert_eq!(e.serve(Method::OPTIONS, "/x").status, 204);
        assert_eq!(e.serve(Method::TRACE, "/x").status, 404);
    }

    #[test]
    fn test_params_returned_to_pool() {
        let mut e = test_engine();
        e.get("/users/:id", |c| {
            let id = c.param("id").unwrap_or_default().to_string();
            c.string(200, id);
        });

        assert_eq!(e.params_pool().idle(), 0);
        assert_eq!(e.serve(Method::GET, "/users/1").body_str(), "1");
        assert_eq!(e.params_pool().idle(), 1);
        assert_eq!(e.serve(Method::GET, "/users/2").body_str(), "2");
        assert_eq!(e.params_pool().idle(), 1);
    }

    #[test]
    fn test_pooled_params_do_not_leak_between_requests() {
        let mut e = test_engine();
        e.get("/a/:first", |c| c.string(200, "a"));
        e.get("/b", |c| {
            let seen = c.params().len().to_string();
            c.string(200, seen);
        });

        assert_eq!(e.serve(Method::GET, "/a/1").body_str(), "a");
        assert_eq!(e.serve(Method::GET, "/b").body_str(), "0");
    }
}
