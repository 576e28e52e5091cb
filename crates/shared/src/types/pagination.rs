//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Calculates the row offset (skip) for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }

    /// Returns the row limit (take) for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// A page of records together with the total match count.
///
/// `count` is the number of rows matching the query ignoring pagination,
/// so callers can compute page counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// The records in the current page.
    pub records: Vec<T>,
    /// Total number of matching records across all pages.
    pub count: u64,
}

impl<T> Paginated<T> {
    /// Creates a new paginated result.
    #[must_use]
    pub const fn new(records: Vec<T>, count: u64) -> Self {
        Self { records, count }
    }

    /// Maps the records into another type, keeping the count.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            records: self.records.into_iter().map(f).collect(),
            count: self.count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 20, 0, 20)]
    #[case(2, 20, 20, 20)]
    #[case(3, 10, 20, 10)]
    #[case(0, 10, 0, 10)] // page 0 clamps to the first page
    fn test_offset_and_limit(
        #[case] page: u32,
        #[case] per_page: u32,
        #[case] offset: u64,
        #[case] limit: u64,
    ) {
        let req = PageRequest { page, per_page };
        assert_eq!(req.offset(), offset);
        assert_eq!(req.limit(), limit);
    }

    #[test]
    fn test_defaults() {
        let req = PageRequest::default();
        assert_eq!(req.page, 1);
        assert_eq!(req.per_page, 20);
    }

    #[test]
    fn test_paginated_map_keeps_count() {
        let page = Paginated::new(vec![1, 2, 3], 42);
        let mapped = page.map(|n| n * 2);
        assert_eq!(mapped.records, vec![2, 4, 6]);
        assert_eq!(mapped.count, 42);
    }
}
