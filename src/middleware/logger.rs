use std::time::Instant;

use tracing::info;

use crate::context::{handler, HandlerFunc};

/// Log method, path, status and latency of every request that reaches it.
#[must_use]
pub fn logger() -> HandlerFunc {
    handler(|c| {
        let start = Instant::now();
        c.next();
        info!(
            method = %c.method(),
            path = %c.path(),
            status = c.response().status,
            latency_us = start.elapsed().as_micros(),
            "Request completed"
        );
    })
}
