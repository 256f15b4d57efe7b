use db::{DBService, DbErr};
use services::services::{project::ProjectService, status::StatusService, task::TaskService};

/// Shared request state: the database handle plus the stateless domain
/// services.
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    project: ProjectService,
    task: TaskService,
    status: StatusService,
}

impl AppState {
    pub async fn new() -> Result<Self, DbErr> {
        Ok(Self::with_db(DBService::new().await?))
    }

    pub fn with_db(db: DBService) -> Self {
        Self {
            db,
            project: ProjectService::new(),
            task: TaskService::new(),
            status: StatusService::new(),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn project(&self) -> &ProjectService {
        &self.project
    }

    pub fn task(&self) -> &TaskService {
        &self.task
    }

    pub fn status(&self) -> &StatusService {
        &self.status
    }
}
