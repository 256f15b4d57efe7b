use db::models::project::{CreateProject, Project, ProjectError, ProjectWithTaskCount};
use sea_orm::{ConnectionTrait, DbErr};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use super::validation::ValidationErrors;

const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Error)]
pub enum ProjectServiceError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Project(#[from] ProjectError),
    #[error("{0}")]
    Validation(ValidationErrors),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectRequest {
    pub name: Option<String>,
}

#[derive(Clone, Default)]
pub struct ProjectService;

impl ProjectService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_projects<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<ProjectWithTaskCount>, ProjectServiceError> {
        Ok(Project::find_all_with_task_count(db).await?)
    }

    pub async fn create_project<C: ConnectionTrait>(
        &self,
        db: &C,
        payload: CreateProjectRequest,
    ) -> Result<ProjectWithTaskCount, ProjectServiceError> {
        let mut errors = ValidationErrors::new();

        let name = payload.name.as_deref().map(str::trim).unwrap_or_default();
        if name.is_empty() {
            errors.add("name", "O nome do projeto é obrigatório.");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add("name", "O nome deve ter no máximo 255 caracteres.");
        } else if Project::find_by_name(db, name).await?.is_some() {
            errors.add("name", "Já existe um projeto com este nome.");
        }

        if !errors.is_empty() {
            return Err(ProjectServiceError::Validation(errors));
        }

        let project = Project::create(
            db,
            &CreateProject {
                name: name.to_string(),
            },
            Uuid::new_v4(),
        )
        .await?;
        tracing::info!(project_id = %project.id, "Created project '{}'", project.name);

        Ok(ProjectWithTaskCount {
            project,
            tasks_count: 0,
        })
    }

    pub async fn delete_project<C: ConnectionTrait>(
        &self,
        db: &C,
        id: Uuid,
    ) -> Result<u64, ProjectServiceError> {
        Ok(Project::delete(db, id).await?)
    }
}
