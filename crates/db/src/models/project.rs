use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    entities::{project, task},
    models::ids,
};

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Project not found")]
    ProjectNotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Listing shape: the project plus its task count, aggregated at read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithTaskCount {
    #[serde(flatten)]
    pub project: Project,
    pub tasks_count: i64,
}

impl std::ops::Deref for ProjectWithTaskCount {
    type Target = Project;
    fn deref(&self) -> &Self::Target {
        &self.project
    }
}

impl std::ops::DerefMut for ProjectWithTaskCount {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.project
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub name: String,
}

impl Project {
    fn from_model(model: project::Model) -> Self {
        Self {
            id: model.uuid,
            name: model.name,
            created_at: model.created_at.into(),
        }
    }

    pub async fn count<C: ConnectionTrait>(db: &C) -> Result<i64, DbErr> {
        let count = project::Entity::find().count(db).await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = project::Entity::find()
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_all_with_task_count<C: ConnectionTrait>(
        db: &C,
    ) -> Result<Vec<ProjectWithTaskCount>, DbErr> {
        let records = project::Entity::find()
            .order_by_desc(project::Column::CreatedAt)
            .order_by_desc(project::Column::Id)
            .all(db)
            .await?;

        let mut projects = Vec::with_capacity(records.len());
        for model in records {
            let tasks_count = task::Entity::find()
                .filter(task::Column::ProjectId.eq(model.id))
                .count(db)
                .await?;
            projects.push(ProjectWithTaskCount {
                project: Self::from_model(model),
                tasks_count: i64::try_from(tasks_count).unwrap_or(i64::MAX),
            });
        }

        Ok(projects)
    }

    pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Self>, DbErr> {
        let record = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    /// Exact-match lookup. SQLite compares TEXT with BINARY collation, so
    /// the match is case-sensitive.
    pub async fn find_by_name<C: ConnectionTrait>(
        db: &C,
        name: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = project::Entity::find()
            .filter(project::Column::Name.eq(name))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    pub async fn task_count<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<i64, DbErr> {
        let row_id = ids::project_id_by_uuid(db, id)
            .await?
            .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;
        let count = task::Entity::find()
            .filter(task::Column::ProjectId.eq(row_id))
            .count(db)
            .await?;
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    pub async fn create<C: ConnectionTrait>(
        db: &C,
        data: &CreateProject,
        project_id: Uuid,
    ) -> Result<Self, DbErr> {
        let now = Utc::now();
        let active = project::ActiveModel {
            uuid: Set(project_id),
            name: Set(data.name.clone()),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let model = active.insert(db).await?;
        Ok(Self::from_model(model))
    }

    pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
        let project = project::Entity::find()
            .filter(project::Column::Uuid.eq(id))
            .one(db)
            .await?;

        let Some(project) = project else {
            return Ok(0);
        };

        // Owned tasks are removed here rather than left to the FK cascade so
        // the behavior holds even when the foreign_keys pragma is off.
        let removed_tasks = task::Entity::delete_many()
            .filter(task::Column::ProjectId.eq(project.id))
            .exec(db)
            .await?
            .rows_affected;

        let result = project::Entity::delete_many()
            .filter(project::Column::Uuid.eq(id))
            .exec(db)
            .await?;

        if result.rows_affected > 0 && removed_tasks > 0 {
            tracing::debug!(project_id = %id, removed_tasks, "Cascade-deleted project tasks");
        }

        Ok(result.rows_affected)
    }
}
