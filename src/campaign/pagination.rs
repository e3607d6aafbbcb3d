use serde::Serialize;

use crate::error::Error;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// A validated 1-based page window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
}

impl Pagination {
    /// Applies defaults and rejects non-positive values rather than letting
    /// them turn into negative offsets.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Pagination, Error> {
        let page_value = page.unwrap_or(DEFAULT_PAGE as i64);
        let limit_value = limit.unwrap_or(DEFAULT_LIMIT as i64);

        if page_value < 1 || limit_value < 1 {
            return Err(Error::InvalidPagination { page, limit });
        }

        Ok(Pagination {
            page: page_value as u64,
            limit: limit_value as u64,
        })
    }

    /// Never exceeds `i64::MAX`, the largest skip mongodb accepts; such a
    /// page is simply empty.
    pub fn offset(&self) -> u64 {
        (self.page - 1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    pub fn count(&self) -> u64 {
        self.limit
    }

    pub fn pages(&self, total: u64) -> u64 {
        (total / self.limit) + if total % self.limit == 0 { 0 } else { 1 }
    }
}

impl Default for Pagination {
    fn default() -> Pagination {
        Pagination {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}
