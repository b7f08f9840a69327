use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

use crate::context::{handler, HandlerFunc};

/// Turn a panic in any later handler into `500 Internal Server Error`.
#[must_use]
pub fn recovery() -> HandlerFunc {
    handler(|c| {
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| c.next())) {
            let message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                method = %c.method(),
                path = %c.path(),
                panic = %message,
                "Handler panicked"
            );
            c.string(500, "Internal Server Error");
        }
    })
}
