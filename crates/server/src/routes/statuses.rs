use axum::{Router, extract::State, response::Json as ResponseJson, routing::get};
use db::models::status::Status;

use crate::{error::ApiError, state::AppState};

pub async fn get_statuses(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Status>>, ApiError> {
    let statuses = state.status().list_statuses(&state.db().pool).await?;
    Ok(ResponseJson(statuses))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/statuses", get(get_statuses))
}
