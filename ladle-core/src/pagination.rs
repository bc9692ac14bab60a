use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 6;
pub const MAX_LIMIT: i64 = 100;

/// Raw pagination parameters as they arrive in a query string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// 1-based page number, used when `offset` is absent.
    pub page: Option<i64>,
}

/// A resolved LIMIT/OFFSET pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

impl PageParams {
    pub fn window(&self) -> Window {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = match (self.offset, self.page) {
            (Some(offset), _) => offset.max(0),
            (None, Some(page)) => (page.max(1) - 1).saturating_mul(limit),
            (None, None) => 0,
        };
        Window { limit, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(
            PageParams::default().window(),
            Window {
                limit: DEFAULT_LIMIT,
                offset: 0
            }
        );
    }

    #[test]
    fn page_number_becomes_offset() {
        let params = PageParams {
            limit: Some(10),
            offset: None,
            page: Some(3),
        };
        assert_eq!(params.window(), Window { limit: 10, offset: 20 });
    }

    #[test]
    fn explicit_offset_wins_over_page() {
        let params = PageParams {
            limit: Some(10),
            offset: Some(5),
            page: Some(3),
        };
        assert_eq!(params.window().offset, 5);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let params = PageParams {
            limit: Some(10_000),
            offset: Some(-4),
            page: None,
        };
        assert_eq!(
            params.window(),
            Window {
                limit: MAX_LIMIT,
                offset: 0
            }
        );

        let params = PageParams {
            limit: Some(0),
            offset: None,
            page: Some(0),
        };
        assert_eq!(params.window(), Window { limit: 1, offset: 0 });
    }
}
