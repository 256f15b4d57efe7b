use std::collections::BTreeMap;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::{
    DbErr,
    models::{project::ProjectError, task::TaskError},
};
use serde::Serialize;
use services::services::{
    project::ProjectServiceError, status::StatusServiceError, task::TaskServiceError,
    validation::ValidationErrors,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Failure body: `{message}`, with per-field `errors` for validation
/// failures.
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl From<ProjectServiceError> for ApiError {
    fn from(err: ProjectServiceError) -> Self {
        match err {
            ProjectServiceError::Database(db_err) => ApiError::Database(db_err),
            ProjectServiceError::Project(project_err) => ApiError::Project(project_err),
            ProjectServiceError::Validation(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::Database(db_err) => ApiError::Database(db_err),
            TaskServiceError::Task(task_err) => ApiError::Task(task_err),
            TaskServiceError::Validation(errors) => ApiError::Validation(errors),
        }
    }
}

impl From<StatusServiceError> for ApiError {
    fn from(err: StatusServiceError) -> Self {
        match err {
            StatusServiceError::Database(db_err) => ApiError::Database(db_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Project(err) => match err {
                ProjectError::ProjectNotFound => (StatusCode::NOT_FOUND, "ProjectError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ProjectError"),
            },
            ApiError::Task(err) => match err {
                TaskError::TaskNotFound | TaskError::ProjectNotFound => {
                    (StatusCode::NOT_FOUND, "TaskError")
                }
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "TaskError"),
            },
            ApiError::Database(db_err) => match db_err {
                DbErr::RecordNotFound(_) => (StatusCode::NOT_FOUND, "DatabaseError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            },
            ApiError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "ValidationError"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        }

        let body = match self {
            ApiError::Validation(errors) => ErrorBody {
                message: errors.message(),
                errors: Some(errors.fields().clone()),
            },
            ApiError::NotFound(message) | ApiError::BadRequest(message) => ErrorBody {
                message,
                errors: None,
            },
            other => ErrorBody {
                message: other.to_string(),
                errors: None,
            },
        };

        (status_code, Json(body)).into_response()
    }
}
