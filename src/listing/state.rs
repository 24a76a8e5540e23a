//! Filter and pagination state of a list screen, as a reducer.
//!
//! `ListState::reduce` is a pure function from `(state, action)` to
//! `(state, effect)`. Rendering code dispatches actions and performs the
//! fetch described by `Effect::Fetch`; completed fetches come back in as
//! `ListAction::FetchCompleted`.

use super::debounce::Debouncer;
use crate::models::pagination::{Pagination, DEFAULT_PAGE_SIZE, PAGE_SIZES};
use crate::models::Category;
use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Parameters of one list fetch, tagged with its issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub category: Option<Category>,
}

#[derive(Debug, Clone)]
pub enum ListAction {
    SearchEdited { term: String, at: Instant },
    Tick { at: Instant },
    CategoryChanged(Option<Category>),
    PageRequested(u32),
    PageSizeChanged(u32),
    /// Re-issues the current fetch, e.g. from a retry button.
    Retry,
    FetchCompleted { seq: u64, pagination: Pagination },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Fetch(FetchRequest),
    Applied,
    /// A response older than the last issued request was dropped.
    DiscardedStale,
}

#[derive(Debug, Clone)]
pub struct ListState {
    search_term: String,
    debounced_search_term: String,
    category: Option<Category>,
    current_page: u32,
    page_size: u32,
    total_pages: u64,
    debounce: Debouncer<String>,
    next_seq: u64,
    last_issued: Option<u64>,
}

impl Default for ListState {
    fn default() -> Self {
        ListState {
            search_term: String::new(),
            debounced_search_term: String::new(),
            category: None,
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: 0,
            debounce: Debouncer::new(SEARCH_DEBOUNCE),
            next_seq: 1,
            last_issued: None,
        }
    }
}

impl ListState {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn debounced_search_term(&self) -> &str {
        &self.debounced_search_term
    }

    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        self.total_pages
    }

    pub fn search_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn reduce(mut self, action: ListAction) -> (Self, Effect) {
        let effect = match action {
            ListAction::SearchEdited { term, at } => {
                self.search_term = term.clone();
                self.debounce.schedule(term, at);
                Effect::None
            }
            ListAction::Tick { at } => match self.debounce.poll(at) {
                Some(term) => {
                    self.debounced_search_term = term;
                    self.current_page = 1;
                    Effect::Fetch(self.issue_fetch())
                }
                None => Effect::None,
            },
            ListAction::CategoryChanged(category) => {
                self.category = category;
                self.current_page = 1;
                Effect::Fetch(self.issue_fetch())
            }
            ListAction::PageRequested(page) => {
                let page = self.clamp_page(page);
                if page == self.current_page {
                    Effect::None
                } else {
                    self.current_page = page;
                    Effect::Fetch(self.issue_fetch())
                }
            }
            ListAction::PageSizeChanged(size) => {
                if !PAGE_SIZES.contains(&size) || size == self.page_size {
                    Effect::None
                } else {
                    self.page_size = size;
                    self.current_page = 1;
                    Effect::Fetch(self.issue_fetch())
                }
            }
            ListAction::Retry => Effect::Fetch(self.issue_fetch()),
            ListAction::FetchCompleted { seq, pagination } => {
                if self.last_issued.is_some_and(|last| seq < last) {
                    Effect::DiscardedStale
                } else {
                    self.total_pages = pagination.total_pages;
                    Effect::Applied
                }
            }
        };
        (self, effect)
    }

    fn clamp_page(&self, page: u32) -> u32 {
        let max_page = u32::try_from(self.total_pages.max(1)).unwrap_or(u32::MAX);
        page.clamp(1, max_page)
    }

    fn issue_fetch(&mut self) -> FetchRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.last_issued = Some(seq);
        let search = self.debounced_search_term.trim();
        FetchRequest {
            seq,
            page: self.current_page,
            limit: self.page_size,
            search: (!search.is_empty()).then(|| search.to_string()),
            category: self.category,
        }
    }
}
