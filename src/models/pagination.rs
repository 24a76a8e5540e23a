use serde::Serialize;
use thiserror::Error;

/// Page sizes a listing may be requested with.
pub const PAGE_SIZES: [u32; 4] = [10, 20, 30, 50];
pub const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageRequestError {
    #[error("Page numbers start at 1")]
    ZeroPage,
    #[error("Unsupported page size {0}; use one of 10, 20, 30 or 50")]
    UnsupportedLimit(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Missing values fall back to page 1 and the default page size.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self, PageRequestError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if !PAGE_SIZES.contains(&limit) {
            return Err(PageRequestError::UnsupportedLimit(limit));
        }
        Ok(PageRequest { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.limit as usize)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_count: u64,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(request: PageRequest, total_count: u64) -> Self {
        let total_pages = total_count.div_ceil(u64::from(request.limit));
        let current_page = request.page;
        Pagination {
            current_page,
            total_pages,
            total_count,
            limit: request.limit,
            has_next_page: u64::from(current_page) < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

/// One page of records together with its metadata.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paginated<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
