use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use utils::assets::db_path;

pub mod entities;
pub mod models;
pub mod types;

pub use sea_orm::DbErr;

#[derive(Clone)]
pub struct DBService {
    pub pool: DatabaseConnection,
}

impl DBService {
    /// Opens the file-backed database under the asset directory, creating it
    /// on first run.
    pub async fn new() -> Result<DBService, DbErr> {
        let database_url = format!("sqlite://{}?mode=rwc", db_path().to_string_lossy());
        Self::connect(&database_url).await
    }

    /// Connects to `database_url`, applies pending migrations and re-seeds
    /// the status catalog (upsert by slug, so reconnecting is harmless).
    pub async fn connect(database_url: &str) -> Result<DBService, DbErr> {
        // Single connection: SQLite allows one writer at a time and the
        // tracker serves a single client session, so a larger pool only
        // invites busy errors. This also keeps `sqlite::memory:` databases
        // alive for the lifetime of the service in tests.
        let mut options = ConnectOptions::new(database_url.to_owned());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let pool = Database::connect(options).await?;
        db_migration::Migrator::up(&pool, None).await?;
        models::status::Status::seed_defaults(&pool).await?;

        Ok(DBService { pool })
    }
}
