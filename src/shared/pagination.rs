//! Page requests and the pagination envelope

use serde::Serialize;
use utoipa::ToSchema;

use crate::config::PaginationConfig;
use crate::domain::{DomainError, DomainResult};

/// Bounds applied to `page_size` for one family of endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_page_size: u64,
    pub max_page_size: u64,
}

impl PaginationConfig {
    /// Limits for top-level list endpoints
    pub fn list_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.default_page_size,
            max_page_size: self.max_page_size,
        }
    }

    /// Limits for per-player and per-venue match lists
    pub fn nested_limits(&self) -> PageLimits {
        PageLimits {
            default_page_size: self.nested_default_page_size,
            max_page_size: self.nested_max_page_size,
        }
    }
}

/// A validated page request: `page >= 1`, `1 <= page_size <= max`, and an
/// offset that fits a signed 64-bit SQL parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: Option<u64>, page_size: Option<u64>, limits: PageLimits) -> DomainResult<Self> {
        let page = page.unwrap_or(1);
        let page_size = page_size.unwrap_or(limits.default_page_size);

        if page < 1 {
            return Err(DomainError::validation("page must be greater than or equal to 1"));
        }
        if page_size < 1 || page_size > limits.max_page_size {
            return Err(DomainError::validation(format!(
                "page_size must be between 1 and {}",
                limits.max_page_size
            )));
        }
        let fits = (page - 1)
            .checked_mul(page_size)
            .is_some_and(|offset| i64::try_from(offset).is_ok());
        if !fits {
            return Err(DomainError::validation("page is too large"));
        }

        Ok(Self { page, page_size })
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// Pagination metadata returned next to every list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PaginationMeta {
    /// Rows matching the filters, across all pages
    pub total: u64,
    /// Current page (1-based)
    pub page: u64,
    pub page_size: u64,
    /// `ceil(total / page_size)`
    pub total_pages: u64,
}

impl PaginationMeta {
    pub fn new(total: u64, request: &PageRequest) -> Self {
        Self {
            total,
            page: request.page,
            page_size: request.page_size,
            total_pages: total.div_ceil(request.page_size),
        }
    }
}

/// One page of rows plus its metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationMeta,
}

impl<T: Serialize> Page<T> {
    /// Render as `{ <key>: [...], "pagination": {...} }`
    pub fn into_envelope(self, key: &str) -> serde_json::Value {
        let mut body = serde_json::Map::new();
        body.insert(key.to_string(), serde_json::json!(self.items));
        body.insert("pagination".to_string(), serde_json::json!(self.pagination));
        serde_json::Value::Object(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMITS: PageLimits = PageLimits {
        default_page_size: 100,
        max_page_size: 1000,
    };

    #[test]
    fn defaults_apply_when_absent() {
        let request = PageRequest::new(None, None, LIMITS).unwrap();
        assert_eq!(request, PageRequest { page: 1, page_size: 100 });
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn offset_skips_previous_pages() {
        let request = PageRequest::new(Some(3), Some(25), LIMITS).unwrap();
        assert_eq!(request.offset(), 50);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            PageRequest::new(Some(0), None, LIMITS),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(None, Some(0), LIMITS),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            PageRequest::new(None, Some(1001), LIMITS),
            Err(DomainError::Validation(_))
        ));
        assert!(PageRequest::new(None, Some(1000), LIMITS).is_ok());
    }

    #[test]
    fn rejects_pages_whose_offset_overflows() {
        assert!(matches!(
            PageRequest::new(Some(u64::MAX), Some(1000), LIMITS),
            Err(DomainError::Validation(_))
        ));
        // Fits in u64 but not in a signed OFFSET parameter
        assert!(matches!(
            PageRequest::new(Some(10_000_000_000_000_000), Some(1000), LIMITS),
            Err(DomainError::Validation(_))
        ));

        let last = i64::MAX as u64 / 1000 + 1;
        let request = PageRequest::new(Some(last), Some(1000), LIMITS).unwrap();
        assert!(request.offset() <= i64::MAX as u64);
    }

    #[test]
    fn total_pages_rounds_up() {
        let request = PageRequest { page: 1, page_size: 10 };
        assert_eq!(PaginationMeta::new(0, &request).total_pages, 0);
        assert_eq!(PaginationMeta::new(10, &request).total_pages, 1);
        assert_eq!(PaginationMeta::new(11, &request).total_pages, 2);
    }

    #[test]
    fn envelope_uses_resource_key() {
        let page = Page {
            items: vec![serde_json::json!({"id": 1})],
            pagination: PaginationMeta::new(1, &PageRequest { page: 1, page_size: 5 }),
        };

        let body = page.into_envelope("teams");
        assert_eq!(body["teams"][0]["id"], 1);
        assert_eq!(body["pagination"]["total"], 1);
        assert_eq!(body["pagination"]["page_size"], 5);
        assert_eq!(body["pagination"]["total_pages"], 1);
    }
}
