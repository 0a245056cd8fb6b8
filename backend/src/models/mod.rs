//! Data models shared across database access and API handlers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

/// Query parameters for paginated endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PageQuery {
    /// 1-based page number (default: 1).
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page (default: 10, bounded 1..=20).
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.clamp(1, 20)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.per_page()
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// Wrapper for paginated API responses carrying pre-built relative links.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub prev_page: Option<String>,
    pub next_page: Option<String>,
    pub total_pages: i64,
    pub total_items: i64,
}

impl<T: Serialize> PaginatedResponse<T> {
    /// Builds the page envelope; `base_path` is the relative endpoint path
    /// used for the `prev_page`/`next_page` links.
    pub fn new(items: Vec<T>, base_path: &str, query: &PageQuery, total_items: i64) -> Self {
        let page = query.page();
        let per_page = query.per_page();
        let total_pages = (total_items + per_page - 1) / per_page;

        let link = |target: i64| format!("{}?page={}&per_page={}", base_path, target, per_page);
        let prev_page = (page > 1).then(|| link(page - 1));
        let next_page = (page < total_pages).then(|| link(page + 1));

        Self {
            items,
            prev_page,
            next_page,
            total_pages,
            total_items,
        }
    }
}
