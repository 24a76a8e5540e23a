use crate::helper::action_result::ActionError;
use crate::helper::public_helpers::{self, ViewTracking};
use crate::helper::sanitization_helpers::render_markdown;
use crate::listing::window::PagerView;
use crate::models::pagination::{PageRequest, PAGE_SIZES};
use crate::models::Category;
use redb::Database;
use tera::{Context, Tera};
use thiserror::Error;

/// Pages linked around the current one in the list pager.
pub const PAGER_WIDTH: u32 = 5;
/// Comments shown on a post page.
const POST_PAGE_COMMENTS: u32 = 50;

#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// The public post list: one page of published posts, the pager and the
/// category tabs with their totals.
pub fn render_post_list(
    tera: &Tera,
    db: &Database,
    request: PageRequest,
    search: Option<&str>,
    category: Option<Category>,
) -> Result<String, PageError> {
    let posts = public_helpers::get_published_posts(db, request, search, category)?;
    let counts = public_helpers::get_post_counts_by_category(db)?;
    let total_pages = u32::try_from(posts.pagination.total_pages).unwrap_or(u32::MAX);
    let pager = PagerView::new(request.page(), total_pages, PAGER_WIDTH);

    let mut ctx = Context::new();
    ctx.insert("posts", &posts.items);
    ctx.insert("pagination", &posts.pagination);
    ctx.insert("pager", &pager);
    ctx.insert("counts", &counts);
    ctx.insert("categories", &Category::ALL.map(|c| c.as_str()));
    ctx.insert("category", category.map(|c| c.as_str()).unwrap_or(""));
    ctx.insert("search", &search.map(str::trim).unwrap_or(""));
    ctx.insert("limit", &request.limit());
    ctx.insert("page_sizes", &PAGE_SIZES);
    Ok(tera.render("public/index.html", &ctx)?)
}

/// A post page. Cached renders are shared between visitors, so rendering
/// does not count a view.
pub fn render_post_page(tera: &Tera, db: &Database, slug: &str) -> Result<String, PageError> {
    let detail = public_helpers::get_post_detail(db, slug, ViewTracking::Skip)?;
    let request = PageRequest::new(Some(1), Some(POST_PAGE_COMMENTS)).map_err(ActionError::from)?;
    let comments = public_helpers::get_active_comments(db, slug, request)?;

    let mut ctx = Context::new();
    ctx.insert("description_html", &render_markdown(&detail.post.description));
    ctx.insert("post", &detail.post);
    ctx.insert("parking_label", &detail.store.as_ref().map(|s| s.parking_status.label()));
    ctx.insert("store", &detail.store);
    ctx.insert("comment_count", &detail.comment_count);
    ctx.insert("comments", &comments.items);
    Ok(tera.render("public/post.html", &ctx)?)
}
