//! Seeded in-memory store, the offline-development fallback.
//!
//! Collections live behind an injected, explicitly owned handle - there is
//! no module-level state. All reads hand out copies so callers never alias
//! store internals.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::{
    normalize_tags, Client, ClientQuery, CreateClientInput, CreateProjectInput, CreateTaskInput,
    CreateTimeEntryInput, Project, Task, TaskPriority, TaskStatus, TimeEntry, UpdateClientInput,
    UpdateProjectInput, UpdateTaskInput, UpdateTimeEntryInput, User, DEFAULT_PROJECT_COLOR,
};

/// Seed collections for offline development. Any section may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub time_entries: Vec<TimeEntry>,
    #[serde(default)]
    pub users: Vec<User>,
}

impl SeedData {
    /// The seed set compiled into the binary.
    pub fn embedded() -> Self {
        serde_json::from_str(include_str!("../../seeds/dev.json")).unwrap_or_else(|e| {
            tracing::error!(error = %e, "embedded seed data is malformed");
            Self::default()
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Invalid(format!("cannot read seed file: {e}")))?;
        serde_json::from_str(&raw).map_err(|e| Error::Invalid(format!("malformed seed file: {e}")))
    }
}

#[derive(Debug, Default)]
struct State {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    clients: Vec<Client>,
    time_entries: Vec<TimeEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<State>>,
}

fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> i64) -> i64 {
    items.iter().map(id_of).max().unwrap_or(0) + 1
}

fn build_task(input: &CreateTaskInput, id: i64, today: chrono::NaiveDate) -> Task {
    let status = input.status.unwrap_or_default();
    Task {
        id,
        title: input.title.trim().to_string(),
        description: input.description.clone().unwrap_or_default(),
        status,
        priority: input.priority.unwrap_or_default(),
        due_date: input.due_date,
        project_id: input.project_id,
        assignee: input.assignee,
        tags: normalize_tags(&input.tags),
        estimated_time: input.estimated_time.unwrap_or(0.0),
        actual_time: 0.0,
        subtasks: input.subtasks.clone(),
        created_at: today,
        completed_at: (status == TaskStatus::Completed).then_some(today),
    }
}

/// Merge a partial update into a task, keeping the completion-date
/// invariant: entering Completed stamps today, leaving it clears the date,
/// staying Completed leaves it alone.
fn apply_task_update(task: &mut Task, input: &UpdateTaskInput, today: chrono::NaiveDate) {
    if let Some(title) = &input.title {
        task.title = title.trim().to_string();
    }
    if let Some(description) = &input.description {
        task.description = description.clone();
    }
    if let Some(priority) = input.priority {
        task.priority = priority;
    }
    if let Some(due_date) = input.due_date {
        task.due_date = Some(due_date);
    }
    if let Some(project_id) = input.project_id {
        task.project_id = Some(project_id);
    }
    if let Some(assignee) = input.assignee {
        task.assignee = Some(assignee);
    }
    if let Some(tags) = &input.tags {
        task.tags = normalize_tags(tags);
    }
    if let Some(estimated) = input.estimated_time {
        task.estimated_time = estimated;
    }
    if let Some(subtasks) = &input.subtasks {
        task.subtasks = subtasks.clone();
    }
    if let Some(status) = input.status {
        if status == TaskStatus::Completed {
            if task.status != TaskStatus::Completed {
                task.completed_at = Some(today);
            }
        } else {
            task.completed_at = None;
        }
        task.status = status;
    }
}

impl MemoryStore {
    pub fn new(seed: SeedData) -> Self {
        Self {
            state: Arc::new(RwLock::new(State {
                tasks: seed.tasks,
                projects: seed.projects,
                clients: seed.clients,
                time_entries: seed.time_entries,
            })),
        }
    }

    pub async fn list_tasks(&self) -> Vec<Task> {
        self.state.read().await.tasks.clone()
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(Error::not_found("task", id))
    }

    pub async fn tasks_by_project(&self, project_id: i64) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| t.project_id == Some(project_id))
            .cloned()
            .collect()
    }

    pub async fn tasks_by_status(&self, status: TaskStatus) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| t.status == status)
            .cloned()
            .collect()
    }

    pub async fn tasks_by_priority(&self, priority: TaskPriority) -> Vec<Task> {
        self.state
            .read()
            .await
            .tasks
            .iter()
            .filter(|t| t.priority == priority)
            .cloned()
            .collect()
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> Task {
        let mut state = self.state.write().await;
        let id = next_id(&state.tasks, |t| t.id);
        let task = build_task(input, id, Utc::now().date_naive());
        state.tasks.push(task.clone());
        task
    }

    pub async fn update_task(&self, id: i64, input: &UpdateTaskInput) -> Result<Task> {
        let mut state = self.state.write().await;
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(Error::not_found("task", id))?;
        apply_task_update(task, input, Utc::now().date_naive());
        Ok(task.clone())
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return Err(Error::not_found("task", id));
        }
        Ok(())
    }

    pub async fn add_time_entry(&self, task_id: i64, input: &CreateTimeEntryInput) -> Result<Task> {
        let mut state = self.state.write().await;
        let entry_id = next_id(&state.time_entries, |e| e.id);
        let task = state
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(Error::not_found("task", task_id))?;
        let now = Utc::now();
        task.actual_time += input.duration;
        let updated = task.clone();
        state.time_entries.push(TimeEntry {
            id: entry_id,
            task_id,
            start_time: input.start_time.unwrap_or(now),
            end_time: input.end_time.unwrap_or(now),
            duration: input.duration,
        });
        Ok(updated)
    }

    pub async fn list_time_entries(&self) -> Vec<TimeEntry> {
        self.state.read().await.time_entries.clone()
    }

    pub async fn entries_for_task(&self, task_id: i64) -> Vec<TimeEntry> {
        self.state
            .read()
            .await
            .time_entries
            .iter()
            .filter(|e| e.task_id == task_id)
            .cloned()
            .collect()
    }

    pub async fn update_time_entry(
        &self,
        id: i64,
        input: &UpdateTimeEntryInput,
    ) -> Result<TimeEntry> {
        let mut state = self.state.write().await;
        let entry = state
            .time_entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::not_found("time entry", id))?;
        if let Some(start) = input.start_time {
            entry.start_time = start;
        }
        if let Some(end) = input.end_time {
            entry.end_time = end;
        }
        if let Some(duration) = input.duration {
            entry.duration = duration;
        }
        Ok(entry.clone())
    }

    pub async fn delete_time_entry(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.time_entries.len();
        state.time_entries.retain(|e| e.id != id);
        if state.time_entries.len() == before {
            return Err(Error::not_found("time entry", id));
        }
        Ok(())
    }

    pub async fn list_projects(&self) -> Vec<Project> {
        self.state.read().await.projects.clone()
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        self.state
            .read()
            .await
            .projects
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(Error::not_found("project", id))
    }

    pub async fn create_project(&self, input: &CreateProjectInput) -> Project {
        let mut state = self.state.write().await;
        let id = next_id(&state.projects, |p| p.id);
        let project = Project {
            id,
            name: input.name.trim().to_string(),
            description: input.description.clone().unwrap_or_default(),
            color: input
                .color
                .clone()
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
            due_date: input.due_date,
            assignee: input.assignee,
            created_at: Utc::now().date_naive(),
        };
        state.projects.push(project.clone());
        project
    }

    pub async fn update_project(&self, id: i64, input: &UpdateProjectInput) -> Result<Project> {
        let mut state = self.state.write().await;
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(Error::not_found("project", id))?;
        if let Some(name) = &input.name {
            project.name = name.trim().to_string();
        }
        if let Some(description) = &input.description {
            project.description = description.clone();
        }
        if let Some(color) = &input.color {
            project.color = color.clone();
        }
        if let Some(due_date) = input.due_date {
            project.due_date = Some(due_date);
        }
        if let Some(assignee) = input.assignee {
            project.assignee = Some(assignee);
        }
        Ok(project.clone())
    }

    /// Tasks referencing the project are left untouched - no cascade.
    pub async fn delete_project(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        if state.projects.len() == before {
            return Err(Error::not_found("project", id));
        }
        Ok(())
    }

    pub async fn list_clients(&self, query: &ClientQuery) -> Vec<Client> {
        self.state
            .read()
            .await
            .clients
            .iter()
            .filter(|c| query.matches(c))
            .cloned()
            .collect()
    }

    pub async fn get_client(&self, id: i64) -> Result<Client> {
        self.state
            .read()
            .await
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(Error::not_found("client", id))
    }

    pub async fn create_client(&self, input: &CreateClientInput) -> Client {
        let mut state = self.state.write().await;
        let id = next_id(&state.clients, |c| c.id);
        let client = Client {
            id,
            full_name: input.full_name.trim().to_string(),
            company_name: input.company_name.clone().unwrap_or_default(),
            email: input.email.clone().unwrap_or_default(),
            phone_number: input.phone_number.clone().unwrap_or_default(),
            status: input.status.unwrap_or_default(),
            notes: input.notes.clone().unwrap_or_default(),
            created_date: Utc::now().date_naive(),
            last_contacted: input.last_contacted,
        };
        state.clients.push(client.clone());
        client
    }

    pub async fn update_client(&self, id: i64, input: &UpdateClientInput) -> Result<Client> {
        let mut state = self.state.write().await;
        let client = state
            .clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Error::not_found("client", id))?;
        if let Some(full_name) = &input.full_name {
            client.full_name = full_name.trim().to_string();
        }
        if let Some(company) = &input.company_name {
            client.company_name = company.clone();
        }
        if let Some(email) = &input.email {
            client.email = email.clone();
        }
        if let Some(phone) = &input.phone_number {
            client.phone_number = phone.clone();
        }
        if let Some(status) = input.status {
            client.status = status;
        }
        if let Some(notes) = &input.notes {
            client.notes = notes.clone();
        }
        if let Some(last_contacted) = input.last_contacted {
            client.last_contacted = Some(last_contacted);
        }
        Ok(client.clone())
    }

    pub async fn delete_client(&self, id: i64) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.clients.len();
        state.clients.retain(|c| c.id != id);
        if state.clients.len() == before {
            return Err(Error::not_found("client", id));
        }
        Ok(())
    }
}
