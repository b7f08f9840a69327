//! Middleware built on the cooperative handler chain.
//!
//! Middleware are ordinary [`HandlerFunc`](crate::context::HandlerFunc)s
//! registered with [`Engine::use_middleware`](crate::engine::Engine::use_middleware).
//! They run before the route handler and wrap it by calling
//! [`Context::next`](crate::context::Context::next).

mod logger;
mod recovery;

pub use logger::logger;
pub use recovery::recovery;
