//! Route pattern parsing.
//!
//! Patterns and request paths are both split into `/`-delimited segments with
//! empty segments dropped, so `//a//b/` and `/a/b` parse identically. Parsing
//! stops after the first catch-all (`*`) segment: at most one catch-all is
//! honored per pattern and anything declared after it is discarded.

use smallvec::SmallVec;

/// Segments held inline before spilling to the heap.
/// Most routes are shallower than this (e.g. `/api/v1/users/:id/posts`).
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Parsed segment list borrowed from the source path.
pub type Segments<'a> = SmallVec<[&'a str; MAX_INLINE_SEGMENTS]>;

/// Split `path` into its non-empty segments, truncating after the first
/// segment that starts with `*`.
///
/// # Example
///
/// ```
/// use lee::router::parse_pattern;
///
/// assert_eq!(parse_pattern("/p/:name").as_slice(), &["p", ":name"]);
/// assert_eq!(parse_pattern("/p/*name/*").as_slice(), &["p", "*name"]);
/// assert!(parse_pattern("/").is_empty());
/// ```
#[must_use]
pub fn parse_pattern(path: &str) -> Segments<'_> {
    let mut parts = Segments::new();
    for item in path.split('/').filter(|s| !s.is_empty()) {
        parts.push(item);
        if is_catch_all(item) {
            break;
        }
    }
    parts
}

/// `true` for `:name` and `*name` segments.
#[inline]
pub(crate) fn is_wild(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

#[inline]
pub(crate) fn is_catch_all(part: &str) -> bool {
    part.starts_with('*')
}
