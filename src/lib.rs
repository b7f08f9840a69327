//! # Lee
//!
//! **Lee** is a small HTTP request router: it maps a method and path to a
//! registered handler through a segment trie, binds named (`:name`) and
//! catch-all (`*name`) path parameters, and runs each request through a
//! cooperative handler chain.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern parsing, the per-method segment trie, and
//!   [`Router`](router::Router) which registers, matches and dispatches
//! - **[`context`]** - The per-request [`Context`](context::Context): path
//!   parameters, the ordered handler chain with its explicit cursor, and the
//!   response writers
//! - **[`params`]** - Parameter maps and the pool that recycles them
//! - **[`engine`]** - [`Engine`](engine::Engine): router, global middleware
//!   and pooled per-request resources behind one `serve` call
//! - **[`middleware`]** - Request logging and panic recovery
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven settings
//!   and `tracing` subscriber setup
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Engine
//!     participant Pool as ParamsPool
//!     participant Router
//!     participant Trie as Method trie
//!     participant Chain as Context chain
//!
//!     Caller->>Engine: serve(GET, "/hello/geektutu")
//!     Engine->>Pool: checkout()
//!     Engine->>Chain: push middlewares
//!     Engine->>Router: handle(ctx)
//!     Router->>Trie: search(["hello", "geektutu"])
//!     alt Route matched
//!         Trie-->>Router: node "/hello/:name"
//!         Router->>Chain: params {name: geektutu}, push route handler
//!     else No route
//!         Router->>Chain: push 404 handler
//!     end
//!     Router->>Chain: next()
//!     Chain->>Chain: middleware -> next() -> handler
//!     Engine-->>Caller: Response
//!     Engine->>Pool: params cleared and returned
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use http::Method;
//! use lee::engine::Engine;
//! use lee::middleware::{logger, recovery};
//!
//! let mut engine = Engine::new();
//! engine.use_middleware(logger()).use_middleware(recovery());
//! engine.get("/assets/*filepath", |c| {
//!     let file = c.param("filepath").unwrap_or_default().to_string();
//!     c.string(200, file);
//! });
//!
//! let res = engine.serve(Method::GET, "/assets/css/a.css");
//! assert_eq!(res.body_str(), "css/a.css");
//! ```
//!
//! ## Concurrency
//!
//! Routes are registered through `&mut` and served through `&`, so a fully
//! built [`Engine`](engine::Engine) or [`Router`](router::Router) can be put
//! in an `Arc` and matched against from many threads without locking. Each
//! request owns its parameter map and handler list.

pub mod context;
pub mod engine;
pub mod logging;
pub mod middleware;
pub mod params;
pub mod router;
pub mod runtime_config;

pub use context::{handler, Context, HandlerFunc, Response};
pub use engine::Engine;
pub use params::{Params, ParamsPool, PooledParams};
pub use router::{parse_pattern, RouteMatch, Router};
