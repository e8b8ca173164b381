//! Pagination utilities for housing-api

/// Default page size when `limit` is omitted
pub const DEFAULT_LIMIT: i64 = 10;

/// Largest page a client may request
pub const MAX_LIMIT: i64 = 1000;

/// Serde default for `limit` query fields
pub fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Sanitized page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Rows to skip (never negative)
    pub skip: i64,
    /// Rows to return, within [1, MAX_LIMIT]
    pub limit: i64,
}

/// Clamp requested skip/limit into a valid window
///
/// # Examples
/// ```
/// use housing_api::pagination::clamp_page;
///
/// let p = clamp_page(20, 50);
/// assert_eq!(p.skip, 20);
/// assert_eq!(p.limit, 50);
///
/// // Out-of-range values get clamped
/// let p = clamp_page(-5, 5000);
/// assert_eq!(p.skip, 0);
/// assert_eq!(p.limit, 1000);
/// ```
pub fn clamp_page(skip: i64, limit: i64) -> Page {
    Page {
        skip: skip.max(0),
        limit: limit.clamp(1, MAX_LIMIT),
    }
}
