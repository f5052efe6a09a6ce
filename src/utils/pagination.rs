use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, RequestPartsExt,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const MAX_PER_PAGE: u32 = 100;

#[derive(Serialize, Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub meta: PaginatedMeta,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PaginatedMeta {
    pub total: u32,
    pub page: u32,
    pub per_page: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u32, page: u32, per_page: u32) -> Paginated<T> {
        Self {
            items,
            meta: PaginatedMeta {
                total,
                page,
                per_page,
            },
        }
    }

    pub fn from_query(items: Vec<T>, total: i64, pagination: &Pagination) -> Paginated<T> {
        Self::new(
            items,
            u32::try_from(total).unwrap_or(u32::MAX),
            pagination.page,
            pagination.per_page,
        )
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    10
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl Pagination {
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * (self.per_page as i64)
    }

    fn is_valid(&self) -> bool {
        self.page >= 1 && (1..=MAX_PER_PAGE).contains(&self.per_page)
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Pagination {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extract::<Query<Pagination>>().await {
            Ok(Query(pagination)) if pagination.is_valid() => Ok(pagination),
            _ => Err((
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid pagination options"})),
            )
                .into_response()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_starts_at_zero_for_the_first_page() {
        let pagination = Pagination::default();
        assert_eq!(pagination.offset(), 0);
        assert_eq!(pagination.limit(), 10);

        let third = Pagination {
            page: 3,
            per_page: 25,
        };
        assert_eq!(third.offset(), 50);
    }

    #[test]
    fn per_page_is_bounded() {
        assert!(!Pagination {
            page: 1,
            per_page: 0
        }
        .is_valid());
        assert!(!Pagination {
            page: 0,
            per_page: 10
        }
        .is_valid());
        assert!(!Pagination {
            page: 1,
            per_page: MAX_PER_PAGE + 1
        }
        .is_valid());
        assert!(Pagination {
            page: 7,
            per_page: MAX_PER_PAGE
        }
        .is_valid());
    }

    #[test]
    fn meta_carries_the_requested_window() {
        let paginated = Paginated::from_query(
            vec!["a", "b"],
            12,
            &Pagination {
                page: 2,
                per_page: 2,
            },
        );

        assert_eq!(
            paginated.meta,
            PaginatedMeta {
                total: 12,
                page: 2,
                per_page: 2
            }
        );
        assert_eq!(paginated.map(str::len).items, vec![1, 1]);
    }
}
