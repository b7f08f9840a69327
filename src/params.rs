//! Path parameter storage and the per-request parameter pool.
//!
//! [`Params`] is the name -> value map filled in by the router for every
//! matched request. [`ParamsPool`] recycles those maps between requests:
//! [`ParamsPool::checkout`] hands out a [`PooledParams`] guard that owns its map
//! exclusively and returns it, cleared, when dropped. Dropping happens on every
//! exit path, including a handler panic unwinding through the request.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;

/// Path parameters bound by a route match (`:name` and `*name` segments)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: HashMap<String, String>,
}

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(capacity),
        }
    }

    /// Get a parameter by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Bind `name` to `value`, replacing an earlier binding of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.inner.insert(name.into(), value.into());
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Remove every binding, keeping the allocation.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy into a plain `HashMap`. Allocates; use [`Params::get`] in handlers.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.inner.clone()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            inner: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug)]
struct PoolInner {
    idle: Mutex<Vec<Params>>,
    max_idle: usize,
    capacity: usize,
}

/// Pool of reusable [`Params`] maps shared by all requests of an engine.
///
/// Cloning the pool is cheap and yields a handle to the same idle list.
#[derive(Debug, Clone)]
pub struct ParamsPool {
    inner: Arc<PoolInner>,
}

impl ParamsPool {
    /// Create a pool that keeps at most `max_idle` maps, each allocated with
    /// room for `capacity` parameters.
    #[must_use]
    pub fn new(max_idle: usize, capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(Vec::new()),
                max_idle,
                capacity,
            }),
        }
    }

    /// Take an empty map out of the pool, allocating one if none is idle.
    #[must_use]
    pub fn checkout(&self) -> PooledParams {
        let params = self
            .inner
            .idle
            .lock()
            .pop()
            .unwrap_or_else(|| Params::with_capacity(self.inner.capacity));
        PooledParams {
            params,
            pool: Arc::clone(&self.inner),
        }
    }

    /// Number of maps currently waiting in the pool
    #[must_use]
    pub fn idle(&self) -> usize {
        self.inner.idle.lock().len()
    }
}

/// Exclusively owned [`Params`] checked out of a [`ParamsPool`].
///
/// Dereferences to [`Params`]. On drop the map is cleared and returned to the
/// pool unless the pool is already holding `max_idle` maps.
#[derive(Debug)]
pub struct PooledParams {
    params: Params,
    pool: Arc<PoolInner>,
}

impl Deref for PooledParams {
    type Target = Params;

    fn deref(&self) -> &Params {
        &self.params
    }
}

impl DerefMut for PooledParams {
    fn deref_mut(&mut self) -> &mut Params {
        &mut self.params
    }
}

impl Drop for PooledParams {
    fn drop(&mut self) {
        let mut params = std::mem::take(&mut self.params);
        params.clear();
        let mut idle = self.pool.idle.lock();
        if idle.len() < self.pool.max_idle {
            idle.push(params);
        }
    }
}
