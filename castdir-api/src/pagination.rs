//! Pagination utilities for the actor list

/// Page number used when none is requested
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when none is requested
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validated page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Current page number (1-indexed)
    pub page: i64,
    /// Items per page
    pub size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    /// Parse optional raw `page` / `size` values
    ///
    /// Absent or blank values take the defaults. Anything that is not a
    /// positive integer is rejected with the offending value, as is a page
    /// with no following page number.
    pub fn parse(page: Option<&str>, size: Option<&str>) -> Result<Self, String> {
        let parsed = Self {
            page: parse_positive(page, DEFAULT_PAGE)?,
            size: parse_positive(size, DEFAULT_PAGE_SIZE)?,
        };

        if parsed.page.checked_add(1).is_none() {
            return Err(parsed.page.to_string());
        }

        Ok(parsed)
    }

    /// Offset for SQL LIMIT/OFFSET query
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }

    /// Whether a previous page exists
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Page number advertised as `next`
    pub fn next_page(&self) -> i64 {
        self.page.saturating_add(1)
    }
}

fn parse_positive(raw: Option<&str>, default: i64) -> Result<i64, String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(value) => value,
    };

    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = Pagination::parse(None, None).unwrap();
        assert_eq!(p, Pagination { page: 1, size: 10 });
        assert_eq!(p.offset(), 0);
        assert!(!p.has_previous());
    }

    #[test]
    fn test_offset() {
        let p = Pagination::parse(Some("3"), Some("25")).unwrap();
        assert_eq!(p.offset(), 50);
        assert!(p.has_previous());
    }

    #[test]
    fn test_blank_takes_default() {
        assert_eq!(Pagination::parse(Some(" "), Some("")).unwrap(), Pagination::default());
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(Pagination::parse(Some("two"), None), Err("two".to_string()));
        assert!(Pagination::parse(None, Some("1.5")).is_err());
    }

    #[test]
    fn test_rejects_page_without_successor() {
        let max = i64::MAX.to_string();
        assert_eq!(Pagination::parse(Some(max.as_str()), None), Err(max.clone()));

        let last = (i64::MAX - 1).to_string();
        let p = Pagination::parse(Some(last.as_str()), Some(max.as_str())).unwrap();
        assert_eq!(p.next_page(), i64::MAX);
        assert_eq!(p.offset(), i64::MAX);
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(Pagination::parse(Some("0"), None).is_err());
        assert!(Pagination::parse(None, Some("-4")).is_err());
    }
}
