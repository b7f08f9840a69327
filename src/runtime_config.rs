//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the engine's request path.
//!
//! ## Environment Variables
//!
//! ### `LEE_PARAMS_CAPACITY`
//!
//! Initial capacity of a freshly allocated path-parameter map. Most routes
//! bind four parameters or fewer. Default: `4`.
//!
//! ### `LEE_POOL_MAX_IDLE`
//!
//! Maximum number of idle parameter maps kept for reuse. Maps released while
//! the pool is full are dropped. Default: `1024`.
//!
//! ### `LEE_SLOW_MATCH_US`
//!
//! Route lookups slower than this many microseconds are logged at `warn`.
//! Default: `1000`.
//!
//! Unparseable values fall back to the defaults.
//!
//! ## Usage
//!
//! ```rust
//! use lee::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Params capacity: {}", config.params_capacity);
//! ```

use std::env;
use std::time::Duration;

const DEFAULT_PARAMS_CAPACITY: usize = 4;
const DEFAULT_POOL_MAX_IDLE: usize = 1024;
const DEFAULT_SLOW_MATCH_US: u64 = 1000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Initial capacity of each path-parameter map
    pub params_capacity: usize,
    /// Idle parameter maps retained by the pool
    pub pool_max_idle: usize,
    /// Lookups slower than this are logged as slow
    pub slow_match: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            params_capacity: DEFAULT_PARAMS_CAPACITY,
            pool_max_idle: DEFAULT_POOL_MAX_IDLE,
            slow_match: Duration::from_micros(DEFAULT_SLOW_MATCH_US),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parse = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());
        let defaults = Self::default();
        Self {
            params_capacity: parse("LEE_PARAMS_CAPACITY")
                .map_or(defaults.params_capacity, |v| v as usize),
            pool_max_idle: parse("LEE_POOL_MAX_IDLE")
                .map_or(defaults.pool_max_idle, |v| v as usize),
            slow_match: parse("LEE_SLOW_MATCH_US")
                .map_or(defaults.slow_match, Duration::from_micros),
        }
    }
}
