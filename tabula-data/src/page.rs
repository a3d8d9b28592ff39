use crate::error::DataError;
use serde::Deserialize;

/// Pagination parameters: a 1-based page, a page size and raw order-by columns.
///
/// Both `page` and `limit` are validated on construction, including when the
/// value is deserialized, and their row offset must fit in an `i64`. `order_by` is used verbatim in the `ORDER BY`
/// clause, so it must never be built from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawPageable")]
pub struct Pageable {
    page: i64,
    limit: i64,
    order_by: Vec<String>,
}

#[derive(Deserialize)]
struct RawPageable {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    #[serde(default)]
    order_by: Vec<String>,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

impl TryFrom<RawPageable> for Pageable {
    type Error = DataError;

    fn try_from(raw: RawPageable) -> Result<Self, Self::Error> {
        Pageable::new(raw.page, raw.limit, raw.order_by)
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
            order_by: Vec::new(),
        }
    }
}

impl Pageable {
    pub fn new(page: i64, limit: i64, order_by: Vec<String>) -> Result<Self, DataError> {
        if limit < 1 {
            return Err(DataError::Validation {
                field: "limit",
                value: limit,
            });
        }
        if page < 1 {
            return Err(DataError::Validation {
                field: "page",
                value: page,
            });
        }
        if (page - 1).checked_mul(limit).is_none() {
            return Err(DataError::InvalidArgument(format!(
                "offset of page {page} with limit {limit} overflows"
            )));
        }
        Ok(Self {
            page,
            limit,
            order_by,
        })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }

    pub fn order_by(&self) -> &[String] {
        &self.order_by
    }

    /// The following page with the same size and ordering, or `None` once its
    /// offset would overflow.
    pub fn next(&self) -> Option<Self> {
        let page = self.page.checked_add(1)?;
        Self::new(page, self.limit, self.order_by.clone()).ok()
    }
}
