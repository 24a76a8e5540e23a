use serde::Serialize;

/// Contiguous page numbers to link around `current`: at most `width` pages,
/// centered where possible and shifted to stay inside `1..=total`.
pub fn page_window(current: u32, total: u32, width: u32) -> Vec<u32> {
    if total == 0 || width == 0 {
        return Vec::new();
    }
    let current = current.clamp(1, total);
    let width = width.min(total);
    let start = current.saturating_sub(width / 2).max(1);
    let end = start.saturating_add(width - 1).min(total);
    let start = end + 1 - width;
    (start..=end).collect()
}

/// Everything a pager needs to render: the window plus edge affordances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagerView {
    pub pages: Vec<u32>,
    pub current: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub first: Option<u32>,
    pub last: Option<u32>,
}

impl PagerView {
    pub fn new(current: u32, total: u32, width: u32) -> Self {
        let pages = page_window(current, total, width);
        let prev = (current > 1 && total > 0).then(|| current.min(total + 1) - 1);
        let next = (current < total).then_some(current + 1);
        // Jump links only when the window hides the edge page.
        let first = pages.first().filter(|&&p| p > 1).map(|_| 1);
        let last = pages.last().filter(|&&p| p < total).map(|_| total);
        PagerView { pages, current, prev, next, first, last }
    }
}
