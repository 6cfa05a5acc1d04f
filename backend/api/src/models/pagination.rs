use serde::Deserialize;

/// Page/limit query parameters with skip/limit translation
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl PageQuery {
    /// Records skipped before the page starts: (page - 1) * limit
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit.max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_skips_previous_pages() {
        let q = PageQuery { page: 3, limit: 5 };
        assert_eq!(q.offset(), 10);
        assert_eq!(q.limit(), 5);
    }

    #[test]
    fn first_page_has_no_offset() {
        assert_eq!(PageQuery::default().offset(), 0);
        // Page 0 and negative pages clamp to the first page
        assert_eq!(PageQuery { page: 0, limit: 10 }.offset(), 0);
        assert_eq!(PageQuery { page: -2, limit: 10 }.offset(), 0);
    }

    #[test]
    fn deserializes_with_defaults() {
        let q: PageQuery = serde_json::from_str("{}").expect("defaults");
        assert_eq!(q.page, 1);
        assert_eq!(q.limit, 10);
    }
}
