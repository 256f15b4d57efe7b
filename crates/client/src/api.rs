use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub tasks_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub project_id: Uuid,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub color: String,
    pub order: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTaskPayload {
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

/// Partial update: omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTaskPayload {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
}

#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("{message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },
    #[error("{0}")]
    NotFound(String),
    #[error("unexpected status {status}: {message}")]
    Unexpected { status: StatusCode, message: String },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// The server round-trips the board needs. A trait so the store can be
/// exercised without a running server.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiClientError>;
    async fn create_project(&self, name: &str) -> Result<Project, ApiClientError>;
    async fn delete_project(&self, id: Uuid) -> Result<(), ApiClientError>;
    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ApiClientError>;
    async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Task, ApiClientError>;
    async fn update_task(
        &self,
        id: Uuid,
        payload: &UpdateTaskPayload,
    ) -> Result<Task, ApiClientError>;
    async fn delete_task(&self, id: Uuid) -> Result<(), ApiClientError>;
    async fn list_statuses(&self) -> Result<Vec<Status>, ApiClientError>;
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[allow(dead_code)]
    message: String,
}

#[derive(Clone)]
pub struct HttpApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        // Some 404s (route middleware) carry no body at all.
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        let message = if body.message.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        } else {
            body.message
        };

        match status {
            StatusCode::UNPROCESSABLE_ENTITY => Err(ApiClientError::Validation {
                message,
                errors: body.errors,
            }),
            StatusCode::NOT_FOUND => Err(ApiClientError::NotFound(message)),
            _ => Err(ApiClientError::Unexpected { status, message }),
        }
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiClientError> {
        let response = self.http.get(self.url("/api/projects")).send().await?;
        Self::decode(response).await
    }

    async fn create_project(&self, name: &str) -> Result<Project, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/projects"))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_project(&self, id: Uuid) -> Result<(), ApiClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/projects/{id}")))
            .send()
            .await?;
        Self::decode::<MessageBody>(response).await.map(|_| ())
    }

    async fn list_tasks(&self, project_id: Uuid) -> Result<Vec<Task>, ApiClientError> {
        let response = self
            .http
            .get(self.url(&format!("/api/projects/{project_id}/tasks")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_task(&self, payload: &CreateTaskPayload) -> Result<Task, ApiClientError> {
        let response = self
            .http
            .post(self.url("/api/tasks"))
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn update_task(
        &self,
        id: Uuid,
        payload: &UpdateTaskPayload,
    ) -> Result<Task, ApiClientError> {
        let response = self
            .http
            .put(self.url(&format!("/api/tasks/{id}")))
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete_task(&self, id: Uuid) -> Result<(), ApiClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/api/tasks/{id}")))
            .send()
            .await?;
        Self::decode::<MessageBody>(response).await.map(|_| ())
    }

    async fn list_statuses(&self) -> Result<Vec<Status>, ApiClientError> {
        let response = self.http.get(self.url("/api/statuses")).send().await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_deserializes_from_wire_field_names() {
        let task: Task = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "project_id": Uuid::new_v4(),
            "titulo": "Design",
            "descricao": null,
            "status": "pending",
            "created_at": "2024-05-01T12:00:00Z",
        }))
        .unwrap();

        assert_eq!(task.title, "Design");
        assert_eq!(task.description, None);
        assert_eq!(task.status, "pending");
    }

    #[test]
    fn update_payload_serializes_only_supplied_fields() {
        let payload = UpdateTaskPayload {
            status: Some("completed".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "completed" })
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = HttpApiClient::new("http://localhost:8000/");
        assert_eq!(
            client.url("/api/projects"),
            "http://localhost:8000/api/projects"
        );
    }
}
