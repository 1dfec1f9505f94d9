//! Page/limit clamping for list endpoints.

/// Default page size when the client sends none.
pub const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
pub const MAX_LIMIT: i64 = 100;

/// Clamp a requested limit into `1..=MAX_LIMIT`, defaulting when absent.
pub fn clamp_limit(requested: Option<i64>) -> i64 {
    requested.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested 1-based page number to at least 1.
pub fn clamp_page(requested: Option<i64>) -> i64 {
    requested.unwrap_or(1).max(1)
}

/// Offset for a clamped page/limit pair.
pub fn offset(page: i64, limit: i64) -> i64 {
    (page - 1) * limit
}

/// Number of pages needed for `total` rows at `limit` per page (minimum 1).
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 {
        return 1;
    }
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_clamps_to_bounds() {
        assert_eq!(clamp_limit(None), DEFAULT_LIMIT);
        assert_eq!(clamp_limit(Some(10)), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(-5)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIMIT);
    }

    #[test]
    fn page_math() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(offset(1, 20), 0);
        assert_eq!(offset(3, 20), 40);
        assert_eq!(total_pages(0, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(59, 20), 3);
    }
}
