use crate::helper::action_result::{failure_body, ActionError};
use crate::models::pagination::PageRequest;
use crate::models::Category;
use actix_web::{error::InternalError, web, HttpResponse};
use serde::Deserialize;

pub mod admin;
pub mod pages;
pub mod public;

/// Query parameters shared by every paginated listing.
#[derive(Deserialize, Debug, Default)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<Category>,
}

impl ListQuery {
    pub fn page_request(&self) -> Result<PageRequest, ActionError> {
        Ok(PageRequest::new(self.page, self.limit)?)
    }
}

/// Malformed query strings and JSON bodies are answered with the same
/// `{success: false, error}` envelope as action failures.
pub fn config_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        let body = failure_body(&format!("Invalid query parameters: {}", err));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    }))
    .app_data(web::JsonConfig::default().limit(256 * 1024).error_handler(|err, _req| {
        let body = failure_body(&format!("Invalid request body: {}", err));
        InternalError::from_response(err, HttpResponse::BadRequest().json(body)).into()
    }));
}

/// Every route of the application: the public API, the guarded admin API
/// and the rendered pages.
pub fn config_app(cfg: &mut web::ServiceConfig) {
    config_extractors(cfg);
    public::config_api(cfg);
    admin::config_admin_api(cfg);
    pages::config_pages(cfg);
}
