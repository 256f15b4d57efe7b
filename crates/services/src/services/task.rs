use std::str::FromStr;

use db::models::{
    ids,
    status::Status,
    task::{CreateTask, Task, TaskError, TaskStatus},
};
use sea_orm::{ConnectionTrait, DbErr};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::validation::ValidationErrors;

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum TaskServiceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error("{0}")]
    Validation(ValidationErrors),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: Option<String>,
    pub project_id: Option<Uuid>,
}

#[derive(Clone, Default)]
pub struct TaskService;

impl TaskService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_tasks_for_project<C: ConnectionTrait>(
        &self,
        db: &C,
        project_id: Uuid,
    ) -> Result<Vec<Task>, TaskServiceError> {
        if ids::project_id_by_uuid(db, project_id).await?.is_none() {
            return Err(TaskError::ProjectNotFound.into());
        }
        Ok(Task::find_by_project_id(db, project_id).await?)
    }

    pub async fn create_task<C: ConnectionTrait>(
        &self,
        db: &C,
        payload: CreateTaskRequest,
    ) -> Result<Task, TaskServiceError> {
        let mut errors = ValidationErrors::new();

        let title = payload.title.as_deref().map(str::trim).unwrap_or_default();
        if title.is_empty() {
            errors.add("titulo", "O título é obrigatório.");
        } else if title.chars().count() > MAX_TITLE_LEN {
            errors.add("titulo", "O título deve ter no máximo 255 caracteres.");
        }

        let status = match payload.status.as_deref() {
            Some(slug) => match Self::resolve_status(db, slug).await? {
                Some(status) => Some(status),
                None => {
                    errors.add("status", "O status informado é inválido.");
                    None
                }
            },
            None => None,
        };

        let project_id = match payload.project_id {
            Some(id) => {
                if ids::project_id_by_uuid(db, id).await?.is_none() {
                    errors.add("project_id", "O projeto informado não existe.");
                    None
                } else {
                    Some(id)
                }
            }
            None => {
                errors.add("project_id", "O projeto é obrigatório.");
                None
            }
        };

        if !errors.is_empty() {
            return Err(TaskServiceError::Validation(errors));
        }

        let project_id = project_id.expect("presence checked above");
        let status = match status {
            Some(status) => status,
            None => Self::default_status(db).await?,
        };

        let task = Task::create(
            db,
            &CreateTask {
                project_id,
                title: title.to_string(),
                description: payload.description.filter(|d| !d.trim().is_empty()),
                status: Some(status),
            },
            Uuid::new_v4(),
        )
        .await?;
        tracing::debug!(task_id = %task.id, project_id = %project_id, "Created task");

        Ok(task)
    }

    pub async fn update_task<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
        payload: UpdateTaskRequest,
    ) -> Result<Task, TaskServiceError> {
        let existing = Task::find_by_id(db, id)
            .await?
            .ok_or(TaskError::TaskNotFound)?;

        let mut errors = ValidationErrors::new();

        let title = match payload.title.as_deref() {
            Some(title) => {
                let title = title.trim();
                if title.is_empty() {
                    errors.add("titulo", "O título é obrigatório.");
                    existing.title.clone()
                } else if title.chars().count() > MAX_TITLE_LEN {
                    errors.add("titulo", "O título deve ter no máximo 255 caracteres.");
                    existing.title.clone()
                } else {
                    title.to_string()
                }
            }
            None => existing.title.clone(),
        };

        let status = match payload.status.as_deref() {
            Some(slug) => match Self::resolve_status(db, slug).await? {
                Some(status) => status,
                None => {
                    errors.add("status", "O status informado é inválido.");
                    existing.status.clone()
                }
            },
            None => existing.status.clone(),
        };

        let project_id = match payload.project_id {
            Some(project_id) => {
                if ids::project_id_by_uuid(db, project_id).await?.is_none() {
                    errors.add("project_id", "O projeto informado não existe.");
                    existing.project_id
                } else {
                    project_id
                }
            }
            None => existing.project_id,
        };

        // Field omitted keeps the stored value; an empty string clears it.
        let description = match payload.description {
            Some(d) if d.trim().is_empty() => None,
            Some(d) => Some(d),
            None => existing.description.clone(),
        };

        if !errors.is_empty() {
            return Err(TaskServiceError::Validation(errors));
        }

        Ok(Task::update(db, id, project_id, title, description, status).await?)
    }

    pub async fn delete_task<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> Result<u64, TaskServiceError> {
        Ok(Task::delete(db, id).await?)
    }

    /// A supplied slug is valid when the statuses table knows it; the closed
    /// enum parse then cannot fail for seeded slugs.
    async fn resolve_status<C: ConnectionTrait>(
        db: &C,
        slug: &str,
    ) -> Result<Option<TaskStatus>, TaskServiceError> {
        if Status::find_by_slug(db, slug).await?.is_none() {
            return Ok(None);
        }
        Ok(TaskStatus::from_str(slug).ok())
    }

    async fn default_status<C: ConnectionTrait>(db: &C) -> Result<TaskStatus, TaskServiceError> {
        let slug = Status::default_slug(db).await?;
        Ok(slug
            .and_then(|slug| TaskStatus::from_str(&slug).ok())
            .unwrap_or(TaskStatus::Pending))
    }
}
