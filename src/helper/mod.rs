use crate::models::db_operations::Page;
use crate::models::pagination::{PageRequest, Paginated, Pagination};

pub mod action_result;
pub mod admin_helpers;
pub mod page_helpers;
pub mod public_helpers;
pub mod render_cache;
pub mod sanitization_helpers;

/// Attaches pagination metadata to a storage page.
pub(crate) fn paginate<T>(page: Page<T>, request: PageRequest) -> Paginated<T> {
    Paginated {
        items: page.items,
        pagination: Pagination::new(request, page.total_count),
    }
}
