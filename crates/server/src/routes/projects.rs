use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get},
};
use db::models::{
    project::{Project, ProjectWithTaskCount},
    task::Task,
};
use services::services::project::CreateProjectRequest;
use utils::response::MessageResponse;

use crate::{error::ApiError, middleware::load_project_middleware, state::AppState};

pub async fn get_projects(
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<ProjectWithTaskCount>>, ApiError> {
    let projects = state.project().list_projects(&state.db().pool).await?;
    Ok(ResponseJson(projects))
}

pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, ResponseJson<ProjectWithTaskCount>), ApiError> {
    tracing::debug!(
        "Creating project '{}'",
        payload.name.as_deref().unwrap_or_default()
    );

    let project = state
        .project()
        .create_project(&state.db().pool, payload)
        .await?;
    Ok((StatusCode::CREATED, ResponseJson(project)))
}

pub async fn delete_project(
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let rows_affected = state
        .project()
        .delete_project(&state.db().pool, project.id)
        .await?;

    if rows_affected == 0 {
        return Err(ApiError::NotFound("Project not found".to_string()));
    }

    Ok(ResponseJson(MessageResponse::new(
        "Projeto deletado com sucesso.",
    )))
}

pub async fn get_project_tasks(
    Extension(project): Extension<Project>,
    State(state): State<AppState>,
) -> Result<ResponseJson<Vec<Task>>, ApiError> {
    let tasks = state
        .task()
        .list_tasks_for_project(&state.db().pool, project.id)
        .await?;
    Ok(ResponseJson(tasks))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let project_id_router = Router::new()
        .route("/", delete(delete_project))
        .route("/tasks", get(get_project_tasks))
        .layer(from_fn_with_state(
            state.clone(),
            load_project_middleware::<AppState>,
        ));

    let projects_router = Router::new()
        .route("/", get(get_projects).post(create_project))
        .nest("/{id}", project_id_router);

    Router::new().nest("/projects", projects_router)
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};
    use db::DBService;

    use super::*;

    async fn setup_state() -> AppState {
        let db = DBService::connect("sqlite::memory:").await.unwrap();
        AppState::with_db(db)
    }

    #[tokio::test]
    async fn create_project_returns_created_with_zero_tasks() {
        let state = setup_state().await;

        let (status, ResponseJson(project)) = create_project(
            State(state),
            Json(CreateProjectRequest {
                name: Some("Website".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(project.name, "Website");
        assert_eq!(project.tasks_count, 0);
    }

    #[tokio::test]
    async fn create_project_duplicate_name_returns_unprocessable() {
        let state = setup_state().await;

        create_project(
            State(state.clone()),
            Json(CreateProjectRequest {
                name: Some("Website".to_string()),
            }),
        )
        .await
        .unwrap();

        let err = create_project(
            State(state),
            Json(CreateProjectRequest {
                name: Some("Website".to_string()),
            }),
        )
        .await
        .unwrap_err();

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            json.get("message").and_then(|v| v.as_str()),
            Some("Já existe um projeto com este nome.")
        );
        assert_eq!(
            json.pointer("/errors/name/0").and_then(|v| v.as_str()),
            Some("Já existe um projeto com este nome.")
        );
    }
}
