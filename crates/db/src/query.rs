//! Typed list-query parameters.
//!
//! List endpoints take these instead of free-form filter strings, so limits
//! and sort direction are validated before any SQL is built.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

/// Pagination and ordering for list queries.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order: Option<SortDir>,
}

impl ListParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn order(&self) -> SortDir {
        self.order.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_limit_and_offset() {
        let params = ListParams {
            limit: Some(10_000),
            offset: Some(-5),
            order: None,
        };
        assert_eq!(params.limit(), MAX_LIMIT);
        assert_eq!(params.offset(), 0);
        assert_eq!(params.order(), SortDir::Desc);
    }

    #[test]
    fn defaults_apply_when_unset() {
        let params = ListParams::default();
        assert_eq!(params.limit(), DEFAULT_LIMIT);
        assert_eq!(params.offset(), 0);
    }
}
