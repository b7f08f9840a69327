//! Per-request context and the cooperative handler chain.
//!
//! A [`Context`] carries the request method and path, the path parameters
//! bound by the router, the response being built, and an ordered list of
//! handlers with an explicit cursor.
//!
//! [`Context::next`] runs the handler under the cursor and advances it. A
//! handler that calls `next()` itself runs the rest of the chain and resumes
//! afterwards, which is how the logger and recovery middleware wrap the route
//! handler. A handler that does not call `next()` ends the chain. Once the
//! cursor is past the last handler `next()` does nothing.

use std::sync::Arc;

use http::Method;
use serde::Serialize;
use tracing::error;

use crate::params::{Params, PooledParams};

/// Handler invoked with the request context
pub type HandlerFunc = Arc<dyn Fn(&mut Context) + Send + Sync>;

/// Wrap a closure as a [`HandlerFunc`].
pub fn handler<F>(f: F) -> HandlerFunc
where
    F: Fn(&mut Context) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Response produced by the handler chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Get a header by name (case-insensitive)
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8, lossily decoded
    #[must_use]
    pub fn body_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// State of one request as it moves through the handler chain
pub struct Context {
    method: Method,
    path: String,
    params: PooledParams,
    handlers: Vec<HandlerFunc>,
    /// Position of the next handler to run
    index: usize,
    response: Response,
}

impl Context {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, params: PooledParams) -> Self {
        Self {
            method,
            path: path.into(),
            params,
            handlers: Vec::new(),
            index: 0,
            response: Response::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path exactly as received
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Get a path parameter by name
    #[inline]
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Method and path alongside mutable params, for binding route parameters
    /// while the path is still borrowed.
    pub(crate) fn route_parts_mut(&mut self) -> (&Method, &str, &mut Params) {
        (&self.method, &self.path, &mut self.params)
    }

    /// Append a handler to the end of the chain.
    pub fn push_handler(&mut self, handler: HandlerFunc) {
        self.handlers.push(handler);
    }

    /// Append several handlers, preserving their order.
    pub fn extend_handlers<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = HandlerFunc>,
    {
        self.handlers.extend(handlers);
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// `true` once every handler in the chain has been started
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.index >= self.handlers.len()
    }

    /// Run the next handler in the chain.
    ///
    /// Returns when that handler returns, i.e. after whatever part of the
    /// remaining chain it chose to run.
    pub fn next(&mut self) {
        let Some(handler) = self.handlers.get(self.index).map(Arc::clone) else {
            return;
        };
        self.index += 1;
        handler(self);
    }

    /// Set the response status code.
    pub fn status(&mut self, code: u16) {
        self.response.status = code;
    }

    /// Add or replace a response header (names compare case-insensitively).
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.response
            .headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.response.headers.push((name.to_owned(), value.into()));
    }

    /// Write a plain-text response.
    pub fn string(&mut self, code: u16, body: impl Into<String>) {
        self.set_header("Content-Type", "text/plain");
        self.status(code);
        self.response.body = body.into().into_bytes();
    }

    /// Write `value` as a JSON response.
    ///
    /// If `value` cannot be serialized the response becomes a 500 with a
    /// JSON error body instead.
    pub fn json<T: Serialize + ?Sized>(&mut self, code: u16, value: &T) {
        self.set_header("Content-Type", "application/json");
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.status(code);
                self.response.body = body;
            }
            Err(e) => {
                error!(path = %self.path, error = %e, "Failed to serialize JSON response");
                self.status(500);
                self.response.body = serde_json::json!({ "error": e.to_string() })
                    .to_string()
                    .into_bytes();
            }
        }
    }

    /// Write raw bytes.
    pub fn data(&mut self, code: u16, body: impl Into<Vec<u8>>) {
        self.status(code);
        self.response.body = body.into();
    }

    #[must_use]
    pub fn response(&self) -> &Response {
        &self.response
    }

    /// Finish the request, releasing the parameter map back to its pool.
    #[must_use]
    pub fn into_response(self) -> Response {
        self.response
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("params", &*self.params)
            .field("handlers", &self.handlers.len())
            .field("index", &self.index)
            .field("response", &self.response)
            .finish()
    }
}
