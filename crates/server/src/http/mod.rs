use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{routes, state::AppState};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::projects::router(&state))
        .merge(routes::tasks::router(&state))
        .merge(routes::statuses::router());

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        // The board is served from its own origin during development.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use db::DBService;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::state::AppState;

    async fn setup_app() -> Router {
        let db = DBService::connect("sqlite::memory:").await.unwrap();
        super::router(AppState::with_db(db))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = setup_app().await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.get("status").and_then(|v| v.as_str()), Some("ok"));
    }

    #[tokio::test]
    async fn statuses_catalog_is_seeded_and_ordered() {
        let app = setup_app().await;

        let (status, body) = send(&app, "GET", "/api/statuses", None).await;
        assert_eq!(status, StatusCode::OK);

        let statuses = body.as_array().unwrap();
        assert_eq!(statuses.len(), 3);
        let slugs: Vec<_> = statuses
            .iter()
            .map(|s| s.get("slug").and_then(|v| v.as_str()).unwrap())
            .collect();
        assert_eq!(slugs, ["pending", "in_progress", "completed"]);
        assert_eq!(
            statuses[0].get("color").and_then(|v| v.as_str()),
            Some("bg-yellow-400")
        );
        assert_eq!(statuses[0].get("order").and_then(|v| v.as_i64()), Some(1));
    }

    #[tokio::test]
    async fn project_task_lifecycle_over_http() {
        let app = setup_app().await;

        // Create a project and check it lists with a zero count.
        let (status, project) =
            send(&app, "POST", "/api/projects", Some(json!({"name": "Website"}))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(project.get("tasks_count").and_then(|v| v.as_i64()), Some(0));
        let project_id = project.get("id").and_then(|v| v.as_str()).unwrap().to_string();

        // Create a task without a status: the seeded default applies.
        let (status, task) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"titulo": "Design", "project_id": project_id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(task.get("status").and_then(|v| v.as_str()), Some("pending"));
        assert_eq!(task.get("titulo").and_then(|v| v.as_str()), Some("Design"));
        let task_id = task.get("id").and_then(|v| v.as_str()).unwrap().to_string();

        // The listing now reports one task.
        let (status, projects) = send(&app, "GET", "/api/projects", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            projects[0].get("tasks_count").and_then(|v| v.as_i64()),
            Some(1)
        );

        // Partial update: only the status changes.
        let (status, updated) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{task_id}"),
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            updated.get("status").and_then(|v| v.as_str()),
            Some("completed")
        );
        assert_eq!(updated.get("titulo").and_then(|v| v.as_str()), Some("Design"));

        // Delete the task and confirm the count drops back to zero.
        let (status, body) =
            send(&app, "DELETE", &format!("/api/tasks/{task_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.get("message").and_then(|v| v.as_str()),
            Some("Tarefa deletada com sucesso.")
        );

        let (_, projects) = send(&app, "GET", "/api/projects", None).await;
        assert_eq!(
            projects[0].get("tasks_count").and_then(|v| v.as_i64()),
            Some(0)
        );
    }

    #[tokio::test]
    async fn deleting_a_project_cascades_to_its_tasks() {
        let app = setup_app().await;

        let (_, project) =
            send(&app, "POST", "/api/projects", Some(json!({"name": "Doomed"}))).await;
        let project_id = project.get("id").and_then(|v| v.as_str()).unwrap().to_string();

        for titulo in ["one", "two"] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/tasks",
                Some(json!({"titulo": titulo, "project_id": project_id})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) =
            send(&app, "DELETE", &format!("/api/projects/{project_id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body.get("message").and_then(|v| v.as_str()),
            Some("Projeto deletado com sucesso.")
        );

        // The project and its task listing are gone.
        let (status, _) = send(
            &app,
            "GET",
            &format!("/api/projects/{project_id}/tasks"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, projects) = send(&app, "GET", "/api/projects", None).await;
        assert_eq!(projects.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn validation_failures_surface_field_messages() {
        let app = setup_app().await;

        let (status, body) = send(&app, "POST", "/api/projects", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.pointer("/errors/name/0").and_then(|v| v.as_str()),
            Some("O nome do projeto é obrigatório.")
        );

        let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.pointer("/errors/titulo/0").and_then(|v| v.as_str()),
            Some("O título é obrigatório.")
        );
        assert_eq!(
            body.pointer("/errors/project_id/0").and_then(|v| v.as_str()),
            Some("O projeto é obrigatório.")
        );
    }

    #[tokio::test]
    async fn invalid_status_slug_is_a_validation_error() {
        let app = setup_app().await;

        let (_, project) =
            send(&app, "POST", "/api/projects", Some(json!({"name": "Website"}))).await;
        let project_id = project.get("id").and_then(|v| v.as_str()).unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/api/tasks",
            Some(json!({"titulo": "Design", "project_id": project_id, "status": "archived"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body.pointer("/errors/status/0").and_then(|v| v.as_str()),
            Some("O status informado é inválido.")
        );
    }

    #[tokio::test]
    async fn unknown_ids_return_not_found() {
        let app = setup_app().await;
        let missing = uuid::Uuid::new_v4();

        let (status, _) =
            send(&app, "DELETE", &format!("/api/projects/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/tasks/{missing}"),
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "DELETE", &format!("/api/tasks/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
