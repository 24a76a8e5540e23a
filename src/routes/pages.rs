use crate::helper::action_result::ActionError;
use crate::helper::page_helpers::{self, PageError};
use crate::helper::render_cache::{post_route, RenderCache};
use crate::routes::ListQuery;
use actix_web::{web, HttpRequest, HttpResponse};
use redb::Database;
use tera::Tera;

pub fn config_pages(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(show_post_list))
        .route("/posts/{slug}", web::get().to(show_post));
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(body)
}

fn page_error_response(err: PageError) -> HttpResponse {
    match err {
        PageError::Action(ActionError::NotFound(_)) => HttpResponse::NotFound().body("Page not found"),
        PageError::Action(ActionError::Validation(message)) => HttpResponse::BadRequest().body(message),
        other => {
            log::error!("Failed to render page: {}", other);
            HttpResponse::InternalServerError().body("Failed to render page")
        }
    }
}

async fn show_post_list(
    req: HttpRequest,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    let request = match query.page_request() {
        Ok(request) => request,
        Err(err) => return page_error_response(err.into()),
    };

    let key = match req.query_string() {
        "" => "/".to_string(),
        query_string => format!("/?{}", query_string),
    };
    let rendered = cache.get_or_render(&key, || {
        page_helpers::render_post_list(&tera, &db, request, query.search.as_deref(), query.category)
    });
    match rendered {
        Ok(body) => html(body),
        Err(err) => page_error_response(err),
    }
}

async fn show_post(
    slug: web::Path<String>,
    tera: web::Data<Tera>,
    db: web::Data<Database>,
    cache: web::Data<RenderCache>,
) -> HttpResponse {
    // Keyed by the decoded slug so invalidation can find it.
    let key = post_route(&slug);
    match cache.get_or_render(&key, || page_helpers::render_post_page(&tera, &db, &slug)) {
        Ok(body) => html(body),
        Err(err) => page_error_response(err),
    }
}
