use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{post, put},
};
use db::models::task::Task;
use services::services::task::{CreateTaskRequest, UpdateTaskRequest};
use utils::response::MessageResponse;

use crate::{error::ApiError, middleware::load_task_middleware, state::AppState};

pub async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    tracing::debug!(
        "Creating task '{}'",
        payload.title.as_deref().unwrap_or_default()
    );

    let task = state.task().create_task(&state.db().pool, payload).await?;
    Ok((StatusCode::CREATED, ResponseJson(task)))
}

pub async fn update_task(
    Extension(existing_task): Extension<Task>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<ResponseJson<Task>, ApiError> {
    let task = state
        .task()
        .update_task(&state.db().pool, existing_task.id, payload)
        .await?;
    Ok(ResponseJson(task))
}

pub async fn delete_task(
    Extension(task): Extension<Task>,
    State(state): State<AppState>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let rows_affected = state.task().delete_task(&state.db().pool, task.id).await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(ResponseJson(MessageResponse::new(
        "Tarefa deletada com sucesso.",
    )))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let task_id_router = Router::new()
        .route("/", put(update_task).delete(delete_task))
        .layer(from_fn_with_state(
            state.clone(),
            load_task_middleware::<AppState>,
        ));

    let tasks_router = Router::new()
        .route("/", post(create_task))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", tasks_router)
}
