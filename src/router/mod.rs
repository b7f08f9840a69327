//! # Router Module
//!
//! Path matching and route resolution.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Parsing route patterns and request paths into segments
//! - Building one segment trie per HTTP method
//! - Matching incoming requests to registered handlers
//! - Binding `:name` and `*name` parameters from the matched pattern
//! - Starting the handler chain for a request ([`Router::handle`])
//!
//! ## Pattern syntax
//!
//! | Form      | Matches                                                     |
//! |-----------|-------------------------------------------------------------|
//! | `literal` | exactly that segment                                        |
//! | `:name`   | any single segment, bound to `name`                         |
//! | `*name`   | one or more remaining segments joined with `/`, bound to `name` |
//!
//! Only the first `*` of a pattern is honored; later segments are dropped.
//!
//! ## Example
//!
//! ```
//! use http::Method;
//! use lee::context::handler;
//! use lee::router::Router;
//!
//! let mut router = Router::new();
//! router.add_route(Method::GET, "/assets/*filepath", handler(|_| {}));
//!
//! let m = router.get_route(&Method::GET, "/assets/css/a.css").unwrap();
//! assert_eq!(m.param("filepath"), Some("css/a.css"));
//! assert!(router.get_route(&Method::POST, "/assets/css/a.css").is_none());
//! ```
//!
//! ## Performance
//!
//! Lookup cost grows with the number of request segments, not the number of
//! routes: literal children are found through a per-node hash index and only
//! wildcard children are scanned.

mod core;
mod pattern;
mod trie;

pub use core::{RouteMatch, Router, DEFAULT_SLOW_MATCH};
pub use pattern::{parse_pattern, Segments, MAX_INLINE_SEGMENTS};
