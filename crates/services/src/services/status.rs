use db::models::status::Status;
use sea_orm::{ConnectionTrait, DbErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatusServiceError {
    #[error(transparent)]
    Database(#[from] DbErr),
}

#[derive(Clone, Default)]
pub struct StatusService;

impl StatusService {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_statuses<C: ConnectionTrait>(
        &self,
        db: &C,
    ) -> Result<Vec<Status>, StatusServiceError> {
        Ok(Status::find_all(db).await?)
    }
}
