use crate::helper::action_result::{parse_id, ActionError};
use crate::helper::public_helpers::{self, ViewTracking};
use crate::helper::render_cache::RenderCache;
use crate::models::CommentInput;
use crate::routes::ListQuery;
use actix_web::{web, HttpResponse, Responder};
use redb::Database;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct CommentPageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

pub fn config_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/is_server_active", web::get().to(is_server_active))
            .route("/posts", web::get().to(get_published_posts))
            .route("/posts/counts", web::get().to(get_post_counts_by_category))
            .route("/posts/{slug}", web::get().to(get_post_detail))
            .route("/posts/{slug}/like", web::post().to(like_post))
            .route("/posts/{slug}/comments", web::get().to(get_comments))
            .route("/posts/{slug}/comments", web::post().to(create_comment))
            .route("/stores/{id}", web::get().to(get_store)),
    );
}

async fn is_server_active() -> impl Responder {
    HttpResponse::Ok().json(json!({ "success": true, "status": "active" }))
}

async fn get_published_posts(
    db: web::Data<Database>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ActionError> {
    let request = query.page_request()?;
    let posts = public_helpers::get_published_posts(&db, request, query.search.as_deref(), query.category)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "posts": posts.items,
        "pagination": posts.pagination,
    })))
}

async fn get_post_counts_by_category(db: web::Data<Database>) -> Result<HttpResponse, ActionError> {
    let counts = public_helpers::get_post_counts_by_category(&db)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "counts": counts })))
}

async fn get_post_detail(slug: web::Path<String>, db: web::Data<Database>) -> Result<HttpResponse, ActionError> {
    let detail = public_helpers::get_post_detail(&db, &slug, ViewTracking::Count)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "post": detail.post,
        "store": detail.store,
        "commentCount": detail.comment_count,
    })))
}

async fn like_post(
    slug: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
) -> Result<HttpResponse, ActionError> {
    let post = public_helpers::like_post(&db, &cache, &slug)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "likes": post.likes })))
}

async fn get_comments(
    slug: web::Path<String>,
    db: web::Data<Database>,
    query: web::Query<CommentPageQuery>,
) -> Result<HttpResponse, ActionError> {
    let request = ListQuery { page: query.page, limit: query.limit, ..Default::default() }.page_request()?;
    let comments = public_helpers::get_active_comments(&db, &slug, request)?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "comments": comments.items,
        "pagination": comments.pagination,
    })))
}

async fn create_comment(
    slug: web::Path<String>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
    input: web::Json<CommentInput>,
) -> Result<HttpResponse, ActionError> {
    let comment = public_helpers::create_comment(&db, &cache, &slug, input.into_inner())?;
    Ok(HttpResponse::Created().json(json!({ "success": true, "comment": comment })))
}

async fn get_store(id: web::Path<String>, db: web::Data<Database>) -> Result<HttpResponse, ActionError> {
    let id = parse_id(&id, "store")?;
    let store = public_helpers::get_store(&db, id)?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "store": store })))
}
