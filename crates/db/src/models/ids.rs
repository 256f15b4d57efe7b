use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use crate::entities::{project, task};

pub async fn project_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    project::Entity::find()
        .select_only()
        .column(project::Column::Id)
        .filter(project::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn project_uuid_by_id<C: ConnectionTrait>(
    db: &C,
    id: i64,
) -> Result<Option<Uuid>, DbErr> {
    project::Entity::find()
        .select_only()
        .column(project::Column::Uuid)
        .filter(project::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

pub async fn task_id_by_uuid<C: ConnectionTrait>(
    db: &C,
    uuid: Uuid,
) -> Result<Option<i64>, DbErr> {
    task::Entity::find()
        .select_only()
        .column(task::Column::Id)
        .filter(task::Column::Uuid.eq(uuid))
        .into_tuple()
        .one(db)
        .await
}

pub async fn task_uuid_by_id<C: ConnectionTrait>(db: &C, id: i64) -> Result<Option<Uuid>, DbErr> {
    task::Entity::find()
        .select_only()
        .column(task::Column::Uuid)
        .filter(task::Column::Id.eq(id))
        .into_tuple()
        .one(db)
        .await
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use crate::models::{
        project::{CreateProject, Project},
        task::{CreateTask, Task},
    };

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn ids_roundtrip_and_uuid_resolution() {
        let db = setup_db().await;

        let project_id = Uuid::new_v4();
        let project = Project::create(
            &db,
            &CreateProject {
                name: "Test project".to_string(),
            },
            project_id,
        )
        .await
        .unwrap();
        assert_eq!(project.id, project_id);

        let project_row_id = project_id_by_uuid(&db, project_id)
            .await
            .unwrap()
            .expect("project row id");
        assert_eq!(
            project_uuid_by_id(&db, project_row_id).await.unwrap(),
            Some(project_id)
        );

        let task_id = Uuid::new_v4();
        let task = Task::create(
            &db,
            &CreateTask {
                project_id,
                title: "Test task".to_string(),
                description: None,
                status: None,
            },
            task_id,
        )
        .await
        .unwrap();
        assert_eq!(task.id, task_id);
        assert_eq!(task.project_id, project_id);

        let task_row_id = task_id_by_uuid(&db, task_id)
            .await
            .unwrap()
            .expect("task row id");
        assert_eq!(task_uuid_by_id(&db, task_row_id).await.unwrap(), Some(task_id));
    }

    #[tokio::test]
    async fn unknown_uuid_resolves_to_none() {
        let db = setup_db().await;
        assert_eq!(project_id_by_uuid(&db, Uuid::new_v4()).await.unwrap(), None);
        assert_eq!(task_id_by_uuid(&db, Uuid::new_v4()).await.unwrap(), None);
    }
}
