use crate::models::db_operations::DbError;
use crate::models::pagination::PageRequestError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

/// Failure taxonomy of every server action. Handlers return it and actix
/// turns it into a `{success: false, error}` body.
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Persistence failure: {0}")]
    Persistence(DbError),
}

impl From<DbError> for ActionError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(what) => ActionError::NotFound(format!("Could not find {}.", what)),
            DbError::Duplicate(what) => ActionError::Conflict(format!("{} is already in use.", what)),
            other => ActionError::Persistence(other),
        }
    }
}

impl From<ValidationErrors> for ActionError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("Invalid value for '{}'", field),
                })
            })
            .collect();
        messages.sort();
        ActionError::Validation(messages.join("; "))
    }
}

impl From<PageRequestError> for ActionError {
    fn from(err: PageRequestError) -> Self {
        ActionError::Validation(err.to_string())
    }
}

impl ResponseError for ActionError {
    fn status_code(&self) -> StatusCode {
        match self {
            ActionError::Validation(_) => StatusCode::BAD_REQUEST,
            ActionError::NotFound(_) => StatusCode::NOT_FOUND,
            ActionError::Conflict(_) => StatusCode::CONFLICT,
            ActionError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ActionError::Persistence(err) => {
                log::error!("Action failed on the database: {}", err);
                "An unexpected database error occurred. Please try again.".to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(failure_body(&message))
    }
}

/// The `{success: false, error}` envelope.
pub fn failure_body(message: &str) -> Value {
    json!({ "success": false, "error": message })
}

/// Parses a path id. Malformed ids cannot name a record, so they are
/// reported as not-found.
pub fn parse_id(raw: &str, kind: &str) -> Result<Uuid, ActionError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ActionError::NotFound(format!("Could not find {} {}.", kind, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_map_onto_the_taxonomy() {
        let conflict = ActionError::from(DbError::Duplicate("storeId 'KR-1'".to_string()));
        assert!(matches!(conflict, ActionError::Conflict(_)));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);

        let missing = ActionError::from(DbError::NotFound("store 42".to_string()));
        assert_eq!(missing.to_string(), "Could not find store 42.");
        assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn malformed_ids_are_not_found() {
        let err = parse_id("not-a-uuid", "comment").unwrap_err();
        assert!(matches!(err, ActionError::NotFound(_)));
        assert!(parse_id(&Uuid::new_v4().to_string(), "comment").is_ok());
    }

    #[test]
    fn page_errors_are_validation_failures() {
        let err = ActionError::from(PageRequestError::ZeroPage);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
