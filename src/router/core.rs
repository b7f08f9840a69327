//! Router core module - hot path for request routing.
//!
//! Keeps one segment trie per HTTP method. Handlers are stored directly on the
//! terminal trie node, so a successful search yields the handler without a
//! second lookup.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use http::Method;
use tracing::{debug, info, warn};

use super::pattern::parse_pattern;
use super::trie::Node;
use crate::context::{handler, Context, HandlerFunc};
use crate::params::Params;

/// Default threshold above which a lookup is logged as slow
pub const DEFAULT_SLOW_MATCH: Duration = Duration::from_millis(1);

/// Result of successfully matching a request path to a route
pub struct RouteMatch<'r> {
    /// Registered pattern that matched, e.g. `/hello/:name`
    pub pattern: &'r str,
    /// Handler registered for the pattern
    pub handler: &'r HandlerFunc,
    /// Parameters bound from the request path
    pub params: Params,
}

impl RouteMatch<'_> {
    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }
}

impl fmt::Debug for RouteMatch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Router that matches HTTP requests to handlers using a segment trie per method
///
/// Routes are registered through `&mut self` and looked up through `&self`,
/// so once the router is shared (by reference or `Arc`) it is read-only and
/// any number of threads may match against it concurrently.
pub struct Router {
    roots: HashMap<Method, Node<HandlerFunc>>,
    slow_match: Duration,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            slow_match: DEFAULT_SLOW_MATCH,
        }
    }

    /// Lookups slower than `threshold` are logged at `warn`.
    #[must_use]
    pub fn with_slow_match_threshold(mut self, threshold: Duration) -> Self {
        self.slow_match = threshold;
        self
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Registering the same pattern twice replaces the earlier handler.
    /// Anything after the first `*` segment of `pattern` is ignored.
    pub fn add_route(&mut self, method: Method, pattern: &str, handler: HandlerFunc) {
        let parts = parse_pattern(pattern);
        let root = self.roots.entry(method.clone()).or_default();
        let replaced = root.insert(pattern, &parts, 0, handler).is_some();

        if replaced {
            debug!(method = %method, pattern = %pattern, "Replaced existing route handler");
        } else {
            debug!(method = %method, pattern = %pattern, "Route inserted");
        }
    }

    /// Match `method` and `path` to a registered route.
    ///
    /// Returns `None` when nothing matches, including when no route was ever
    /// registered for `method`.
    ///
    /// # Example
    ///
    /// ```
    /// use http::Method;
    /// use lee::context::handler;
    /// use lee::router::Router;
    ///
    /// let mut router = Router::new();
    /// router.add_route(Method::GET, "/hello/:name", handler(|_| {}));
    ///
    /// let m = router.get_route(&Method::GET, "/hello/geektutu").unwrap();
    /// assert_eq!(m.pattern, "/hello/:name");
    /// assert_eq!(m.param("name"), Some("geektutu"));
    /// ```
    #[must_use]
    pub fn get_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let parts = parse_pattern(path);
        let node = self.search(method, path, &parts)?;
        let mut params = Params::new();
        bind_params(node.pattern(), &parts, &mut params);
        Some(RouteMatch {
            pattern: node.pattern(),
            handler: node.value()?,
            params,
        })
    }

    /// Route the request held by `ctx` and start its handler chain.
    ///
    /// On a match the context's parameters are replaced by the ones bound from
    /// the path and the route handler is appended to the chain; otherwise a
    /// handler answering `404 NOT FOUND: <path>` is appended. Either way
    /// [`Context::next`] is called exactly once.
    pub fn handle(&self, ctx: &mut Context) {
        let route_handler = {
            let (method, path, params) = ctx.route_parts_mut();
            let parts = parse_pattern(path);
            let found = self.search(method, path, &parts);
            match found {
                Some(node) => {
                    params.clear();
                    bind_params(node.pattern(), &parts, params);
                    node.value().map(Arc::clone)
                }
                None => {
                    warn!(method = %method, path = %path, "No route matched");
                    None
                }
            }
        };

        ctx.push_handler(route_handler.unwrap_or_else(not_found));
        ctx.next();
    }

    fn search<'r>(
        &'r self,
        method: &Method,
        path: &str,
        parts: &[&str],
    ) -> Option<&'r Node<HandlerFunc>> {
        debug!(method = %method, path = %path, "Route match attempt");
        let start = Instant::now();
        let node = self.roots.get(method)?.search(parts, 0);
        let elapsed = start.elapsed();

        if let Some(node) = node {
            if elapsed > self.slow_match {
                warn!(
                    method = %method,
                    path = %path,
                    route_pattern = %node.pattern(),
                    duration_us = elapsed.as_micros(),
                    "Slow route matching detected"
                );
            } else {
                debug!(
                    method = %method,
                    path = %path,
                    route_pattern = %node.pattern(),
                    duration_us = elapsed.as_micros(),
                    "Route matched"
                );
            }
        }
        node
    }

    /// All registered routes as `(method, pattern)`, sorted.
    #[must_use]
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut out = Vec::new();
        for (method, root) in &self.roots {
            let mut patterns = Vec::new();
            root.collect_patterns(&mut patterns);
            out.extend(patterns.into_iter().map(|p| (method.clone(), p)));
        }
        out.sort_by(|a, b| (a.0.as_str(), &a.1).cmp(&(b.0.as_str(), &b.1)));
        out
    }

    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes().len()
    }

    /// Log the routing table: a summary at `info`, every route at `debug`.
    pub fn dump_routes(&self) {
        let routes = self.routes();
        let routes_summary: Vec<String> = routes
            .iter()
            .take(10)
            .map(|(method, pattern)| format!("{method} {pattern}"))
            .collect();
        info!(
            routes_count = routes.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );
        for (method, pattern) in &routes {
            debug!(method = %method, pattern = %pattern, "Route");
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("roots", &self.roots)
            .field("slow_match", &self.slow_match)
            .finish()
    }
}

/// Bind parameters by walking the matched `pattern` alongside the request.
///
/// `:name` binds the request segment at the same depth. `*name` binds the
/// rest of the request joined with `/` and ends the walk; a bare `*` binds
/// nothing.
fn bind_params(pattern: &str, request: &[&str], params: &mut Params) {
    for (index, part) in parse_pattern(pattern).iter().enumerate() {
        if let Some(name) = part.strip_prefix(':') {
            if let Some(value) = request.get(index) {
                params.insert(name, *value);
            }
        } else if let Some(name) = part.strip_prefix('*') {
            if !name.is_empty() {
                params.insert(name, request.get(index..).unwrap_or_default().join("/"));
            }
            break;
        }
    }
}

fn not_found() -> HandlerFunc {
    handler(|c| {
        let body = format!("404 NOT FOUND: {}\n", c.path());
        c.string(404, body);
    })
}
