use uuid::Uuid;

use crate::api::{
    ApiClient, ApiClientError, CreateTaskPayload, Project, Status, Task, UpdateTaskPayload,
};

/// Input for a task created from the board; the owning project comes from
/// the current selection.
#[derive(Debug, Clone, Default)]
pub struct TaskDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

/// In-memory mirror of the server state for one board session.
///
/// Loads record a display error and swallow the failure; mutations record
/// the error and also hand it back to the caller. Every action clears the
/// loading flag on the way out, whichever path it took.
pub struct TaskStore<C: ApiClient> {
    api: C,
    projects: Vec<Project>,
    selected_project_id: Option<Uuid>,
    tasks: Vec<Task>,
    statuses: Vec<Status>,
    loading: bool,
    error: Option<String>,
}

impl<C: ApiClient> TaskStore<C> {
    pub fn new(api: C) -> Self {
        Self {
            api,
            projects: Vec::new(),
            selected_project_id: None,
            tasks: Vec::new(),
            statuses: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn statuses(&self) -> &[Status] {
        &self.statuses
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_project_id(&self) -> Option<Uuid> {
        self.selected_project_id
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project_id
            .and_then(|id| self.projects.iter().find(|p| p.id == id))
    }

    /// Tasks grouped by status slug in catalog order, recomputed from the
    /// current snapshot on every call.
    pub fn tasks_by_status(&self) -> Vec<(&Status, Vec<&Task>)> {
        self.statuses
            .iter()
            .map(|status| {
                let tasks = self
                    .tasks
                    .iter()
                    .filter(|task| task.status == status.slug)
                    .collect();
                (status, tasks)
            })
            .collect()
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn finish(&mut self) {
        self.loading = false;
    }

    pub async fn load_projects(&mut self) {
        self.begin();
        match self.api.list_projects().await {
            Ok(projects) => self.projects = projects,
            Err(err) => {
                tracing::error!("Failed to load projects: {err}");
                self.error = Some("Erro ao carregar projetos".to_string());
            }
        }
        self.finish();
    }

    pub async fn create_project(&mut self, name: &str) -> Result<Project, ApiClientError> {
        self.begin();
        let result = match self.api.create_project(name).await {
            Ok(mut project) => {
                project.tasks_count = 0;
                self.projects.push(project.clone());
                Ok(project)
            }
            Err(err) => {
                self.error = Some("Erro ao criar projeto".to_string());
                Err(err)
            }
        };
        self.finish();
        result
    }

    pub async fn delete_project(&mut self, project_id: Uuid) -> Result<(), ApiClientError> {
        self.begin();
        let result = match self.api.delete_project(project_id).await {
            Ok(()) => {
                self.projects.retain(|p| p.id != project_id);
                if self.selected_project_id == Some(project_id) {
                    self.selected_project_id = None;
                    self.tasks.clear();
                }
                Ok(())
            }
            Err(err) => {
                self.error = Some("Erro ao deletar projeto".to_string());
                Err(err)
            }
        };
        self.finish();
        result
    }

    pub async fn load_tasks(&mut self, project_id: Uuid) {
        self.begin();
        self.selected_project_id = Some(project_id);
        // Drop the previous board before fetching so a slow response never
        // shows another project's tasks.
        self.tasks.clear();

        match self.api.list_tasks(project_id).await {
            Ok(tasks) => {
                let count = tasks.len() as i64;
                self.tasks = tasks;
                if let Some(project) = self.projects.iter_mut().find(|p| p.id == project_id) {
                    project.tasks_count = count;
                }
            }
            Err(err) => {
                tracing::error!("Failed to load tasks: {err}");
                self.error = Some("Erro ao carregar tarefas".to_string());
            }
        }
        self.finish();
    }

    pub async fn create_task(&mut self, draft: TaskDraft) -> Result<Task, ApiClientError> {
        self.begin();

        let default_status = self.statuses.first().map(|s| s.slug.clone());
        let payload = CreateTaskPayload {
            title: Some(draft.title),
            description: draft.description,
            status: draft.status.or(default_status),
            project_id: self.selected_project_id,
        };

        let result = match self.api.create_task(&payload).await {
            Ok(task) => {
                self.tasks.push(task.clone());
                let selected = self.selected_project_id;
                if let Some(project) = self
                    .projects
                    .iter_mut()
                    .find(|p| Some(p.id) == selected)
                {
                    project.tasks_count += 1;
                }
                Ok(task)
            }
            Err(err) => {
                self.error = Some("Erro ao criar tarefa".to_string());
                Err(err)
            }
        };
        self.finish();
        result
    }

    pub async fn update_task(
        &mut self,
        task_id: Uuid,
        updates: UpdateTaskPayload,
    ) -> Result<Task, ApiClientError> {
        self.begin();
        let result = match self.api.update_task(task_id, &updates).await {
            Ok(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                    *slot = task.clone();
                }
                Ok(task)
            }
            Err(err) => {
                self.error = Some("Erro ao atualizar tarefa".to_string());
                Err(err)
            }
        };
        self.finish();
        result
    }

    pub async fn delete_task(&mut self, task_id: Uuid) -> Result<(), ApiClientError> {
        self.begin();
        let result = match self.api.delete_task(task_id).await {
            Ok(()) => {
                self.tasks.retain(|t| t.id != task_id);
                let selected = self.selected_project_id;
                if let Some(project) = self
                    .projects
                    .iter_mut()
                    .find(|p| Some(p.id) == selected)
                {
                    // The counter mirrors the server; it can never go below
                    // an empty board.
                    if project.tasks_count > 0 {
                        project.tasks_count -= 1;
                    }
                }
                Ok(())
            }
            Err(err) => {
                self.error = Some("Erro ao deletar tarefa".to_string());
                Err(err)
            }
        };
        self.finish();
        result
    }

    pub async fn load_statuses(&mut self) -> Result<(), ApiClientError> {
        self.begin();
        let result = match self.api.list_statuses().await {
            Ok(statuses) => {
                self.statuses = statuses;
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to load statuses: {err}");
                self.error = Some("Erro ao carregar statuses".to_string());
                Err(err)
            }
        };
        self.finish();
        result
    }
}
