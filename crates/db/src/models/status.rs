use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::entities::status;

/// Fixed taxonomy shipped with the tracker. Kept verbatim: existing clients
/// match on these slugs and color tokens.
const SEED_STATUSES: &[(&str, &str, &str, i32)] = &[
    ("Pendente", "pending", "bg-yellow-400", 1),
    ("Em Andamento", "in_progress", "bg-blue-400", 2),
    ("Concluído", "completed", "bg-green-400", 3),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub order: i32,
}

impl Status {
    fn from_model(model: status::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            slug: model.slug,
            color: model.color,
            order: model.order,
        }
    }

    pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Self>, DbErr> {
        let records = status::Entity::find()
            .order_by_asc(status::Column::Order)
            .all(db)
            .await?;
        Ok(records.into_iter().map(Self::from_model).collect())
    }

    pub async fn find_by_slug<C: ConnectionTrait>(
        db: &C,
        slug: &str,
    ) -> Result<Option<Self>, DbErr> {
        let record = status::Entity::find()
            .filter(status::Column::Slug.eq(slug))
            .one(db)
            .await?;
        Ok(record.map(Self::from_model))
    }

    /// Slug of the lowest-`order` status, used as the default for new tasks.
    pub async fn default_slug<C: ConnectionTrait>(db: &C) -> Result<Option<String>, DbErr> {
        status::Entity::find()
            .select_only()
            .column(status::Column::Slug)
            .order_by_asc(status::Column::Order)
            .into_tuple()
            .one(db)
            .await
    }

    /// Upserts the fixed taxonomy by slug. Safe to run on every startup.
    pub async fn seed_defaults<C: ConnectionTrait>(db: &C) -> Result<(), DbErr> {
        for &(name, slug, color, order) in SEED_STATUSES {
            let existing = status::Entity::find()
                .filter(status::Column::Slug.eq(slug))
                .one(db)
                .await?;

            match existing {
                Some(model) => {
                    if model.name != name || model.color != color || model.order != order {
                        let mut active: status::ActiveModel = model.into();
                        active.name = Set(name.to_string());
                        active.color = Set(color.to_string());
                        active.order = Set(order);
                        active.updated_at = Set(Utc::now().into());
                        active.update(db).await?;
                    }
                }
                None => {
                    let now = Utc::now();
                    let active = status::ActiveModel {
                        name: Set(name.to_string()),
                        slug: Set(slug.to_string()),
                        color: Set(color.to_string()),
                        order: Set(order),
                        created_at: Set(now.into()),
                        updated_at: Set(now.into()),
                        ..Default::default()
                    };
                    active.insert(db).await?;
                    tracing::debug!(slug, "Seeded status");
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    use super::*;

    async fn setup_db() -> sea_orm::DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db_migration::Migrator::up(&db, None).await.unwrap();
        db
    }

    #[tokio::test]
    async fn seeding_is_idempotent_and_ordered() {
        let db = setup_db().await;

        Status::seed_defaults(&db).await.unwrap();
        Status::seed_defaults(&db).await.unwrap();

        let statuses = Status::find_all(&db).await.unwrap();
        assert_eq!(statuses.len(), 3);
        let slugs: Vec<_> = statuses.iter().map(|s| s.slug.as_str()).collect();
        assert_eq!(slugs, ["pending", "in_progress", "completed"]);
        let orders: Vec<_> = statuses.iter().map(|s| s.order).collect();
        assert_eq!(orders, [1, 2, 3]);
    }

    #[tokio::test]
    async fn seeding_restores_renamed_entries() {
        let db = setup_db().await;
        Status::seed_defaults(&db).await.unwrap();

        let pending = status::Entity::find()
            .filter(status::Column::Slug.eq("pending"))
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut active: status::ActiveModel = pending.into();
        active.name = Set("Mangled".to_string());
        active.update(&db).await.unwrap();

        Status::seed_defaults(&db).await.unwrap();

        let pending = Status::find_by_slug(&db, "pending").await.unwrap().unwrap();
        assert_eq!(pending.name, "Pendente");
        assert_eq!(pending.color, "bg-yellow-400");
    }

    #[tokio::test]
    async fn default_slug_is_lowest_order() {
        let db = setup_db().await;

        assert_eq!(Status::default_slug(&db).await.unwrap(), None);

        Status::seed_defaults(&db).await.unwrap();
        assert_eq!(
            Status::default_slug(&db).await.unwrap().as_deref(),
            Some("pending")
        );
    }
}
