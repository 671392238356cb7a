//! Unified data backend.
//!
//! [`Backend`] is the one handle the server injects everywhere. It selects
//! at construction between the remote record service and the seeded
//! in-memory store, and owns the cross-cutting write operations (bulk
//! status updates, time-entry accumulation) so both modes share one set of
//! semantics. Users are served from the seed set in both modes.

pub mod memory;

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{
    Client, ClientQuery, CreateClientInput, CreateProjectInput, CreateTaskInput,
    CreateTimeEntryInput, Project, Task, TaskPriority, TaskStatus, TimeEntry, UpdateClientInput,
    UpdateProjectInput, UpdateTaskInput, UpdateTimeEntryInput, User,
};
use crate::remote::{RemoteClient, RemoteStore};

pub use memory::{MemoryStore, SeedData};

/// Structured result of a bulk status update. Partial failure is data,
/// not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkStatusOutcome {
    pub succeeded: Vec<i64>,
    pub failed: Vec<i64>,
}

#[derive(Debug, Clone)]
enum Inner {
    Remote(RemoteStore),
    Memory(MemoryStore),
}

#[derive(Debug, Clone)]
pub struct Backend {
    inner: Inner,
    users: Arc<Vec<User>>,
}

impl Backend {
    pub fn remote(client: RemoteClient) -> Self {
        Self {
            inner: Inner::Remote(RemoteStore::new(client)),
            users: Arc::new(SeedData::embedded().users),
        }
    }

    pub fn memory(seed: SeedData) -> Self {
        let users = Arc::new(seed.users.clone());
        Self {
            inner: Inner::Memory(MemoryStore::new(seed)),
            users,
        }
    }

    /// Memory backend with the compiled-in development seed.
    pub fn in_memory() -> Self {
        Self::memory(SeedData::embedded())
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.inner, Inner::Remote(_))
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        match &self.inner {
            Inner::Remote(store) => store.list_tasks().await,
            Inner::Memory(store) => Ok(store.list_tasks().await),
        }
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        match &self.inner {
            Inner::Remote(store) => store.get_task(id).await,
            Inner::Memory(store) => store.get_task(id).await,
        }
    }

    pub async fn tasks_by_project(&self, project_id: i64) -> Result<Vec<Task>> {
        match &self.inner {
            Inner::Remote(store) => store.tasks_by_project(project_id).await,
            Inner::Memory(store) => Ok(store.tasks_by_project(project_id).await),
        }
    }

    pub async fn tasks_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        match &self.inner {
            Inner::Remote(store) => store.tasks_by_status(status).await,
            Inner::Memory(store) => Ok(store.tasks_by_status(status).await),
        }
    }

    pub async fn tasks_by_priority(&self, priority: TaskPriority) -> Result<Vec<Task>> {
        match &self.inner {
            Inner::Remote(store) => store.tasks_by_priority(priority).await,
            Inner::Memory(store) => Ok(store.tasks_by_priority(priority).await),
        }
    }

    /// `today` is supplied by the caller, keeping the clock out of the
    /// query path.
    pub async fn overdue_tasks(&self, today: NaiveDate) -> Result<Vec<Task>> {
        let tasks = self.list_tasks().await?;
        Ok(tasks.into_iter().filter(|t| t.is_overdue(today)).collect())
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> Result<Task> {
        match &self.inner {
            Inner::Remote(store) => store.create_task(input).await,
            Inner::Memory(store) => Ok(store.create_task(input).await),
        }
    }

    pub async fn update_task(&self, id: i64, input: &UpdateTaskInput) -> Result<Task> {
        match &self.inner {
            Inner::Remote(store) => store.update_task(id, input).await,
            Inner::Memory(store) => store.update_task(id, input).await,
        }
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        match &self.inner {
            Inner::Remote(store) => store.delete_task(id).await,
            Inner::Memory(store) => store.delete_task(id).await,
        }
    }

    pub async fn set_status(&self, id: i64, status: TaskStatus) -> Result<Task> {
        self.update_task(id, &UpdateTaskInput::status_only(status))
            .await
    }

    /// One independent update per id; successes are kept even when other
    /// ids fail, and each update carries the completion-date rule. The
    /// whole call only errors when every single update was refused by an
    /// unreachable collaborator.
    pub async fn bulk_update_status(
        &self,
        ids: &[i64],
        status: TaskStatus,
    ) -> Result<BulkStatusOutcome> {
        let mut outcome = BulkStatusOutcome::default();
        let mut unavailable = 0usize;
        let mut last_message = None;
        for &id in ids {
            match self.set_status(id, status).await {
                Ok(_) => outcome.succeeded.push(id),
                Err(err) => {
                    if let Error::Unavailable(message) = &err {
                        unavailable += 1;
                        last_message = Some(message.clone());
                    }
                    tracing::warn!(task_id = id, error = %err, "bulk status update failed for task");
                    outcome.failed.push(id);
                }
            }
        }
        if !ids.is_empty() && unavailable == ids.len() {
            return Err(Error::Unavailable(
                last_message.unwrap_or_else(|| "record service unreachable".to_string()),
            ));
        }
        Ok(outcome)
    }

    pub async fn add_time_entry(&self, task_id: i64, input: &CreateTimeEntryInput) -> Result<Task> {
        match &self.inner {
            Inner::Remote(store) => store.add_time_entry(task_id, input).await,
            Inner::Memory(store) => store.add_time_entry(task_id, input).await,
        }
    }

    pub async fn list_time_entries(&self) -> Result<Vec<TimeEntry>> {
        match &self.inner {
            Inner::Remote(store) => store.list_time_entries().await,
            Inner::Memory(store) => Ok(store.list_time_entries().await),
        }
    }

    pub async fn entries_for_task(&self, task_id: i64) -> Result<Vec<TimeEntry>> {
        match &self.inner {
            Inner::Remote(store) => store.entries_for_task(task_id).await,
            Inner::Memory(store) => Ok(store.entries_for_task(task_id).await),
        }
    }

    pub async fn total_time_for_task(&self, task_id: i64) -> Result<f64> {
        let entries = self.entries_for_task(task_id).await?;
        Ok(entries.iter().map(|e| e.duration).sum())
    }

    /// Entries whose start day falls within `[start, end]` inclusive.
    pub async fn entries_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TimeEntry>> {
        let entries = self.list_time_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|e| {
                let day = e.start_time.date_naive();
                day >= start && day <= end
            })
            .collect())
    }

    pub async fn update_time_entry(
        &self,
        id: i64,
        input: &UpdateTimeEntryInput,
    ) -> Result<TimeEntry> {
        match &self.inner {
            Inner::Remote(store) => store.update_time_entry(id, input).await,
            Inner::Memory(store) => store.update_time_entry(id, input).await,
        }
    }

    pub async fn delete_time_entry(&self, id: i64) -> Result<()> {
        match &self.inner {
            Inner::Remote(store) => store.delete_time_entry(id).await,
            Inner::Memory(store) => store.delete_time_entry(id).await,
        }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        match &self.inner {
            Inner::Remote(store) => store.list_projects().await,
            Inner::Memory(store) => Ok(store.list_projects().await),
        }
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        match &self.inner {
            Inner::Remote(store) => store.get_project(id).await,
            Inner::Memory(store) => store.get_project(id).await,
        }
    }

    pub async fn create_project(&self, input: &CreateProjectInput) -> Result<Project> {
        match &self.inner {
            Inner::Remote(store) => store.create_project(input).await,
            Inner::Memory(store) => Ok(store.create_project(input).await),
        }
    }

    pub async fn update_project(&self, id: i64, input: &UpdateProjectInput) -> Result<Project> {
        match &self.inner {
            Inner::Remote(store) => store.update_project(id, input).await,
            Inner::Memory(store) => store.update_project(id, input).await,
        }
    }

    pub async fn delete_project(&self, id: i64) -> Result<()> {
        match &self.inner {
            Inner::Remote(store) => store.delete_project(id).await,
            Inner::Memory(store) => store.delete_project(id).await,
        }
    }

    pub async fn list_clients(&self, query: &ClientQuery) -> Result<Vec<Client>> {
        match &self.inner {
            Inner::Remote(store) => store.list_clients(query).await,
            Inner::Memory(store) => Ok(store.list_clients(query).await),
        }
    }

    pub async fn get_client(&self, id: i64) -> Result<Client> {
        match &self.inner {
            Inner::Remote(store) => store.get_client(id).await,
            Inner::Memory(store) => store.get_client(id).await,
        }
    }

    pub async fn create_client(&self, input: &CreateClientInput) -> Result<Client> {
        match &self.inner {
            Inner::Remote(store) => store.create_client(input).await,
            Inner::Memory(store) => Ok(store.create_client(input).await),
        }
    }

    pub async fn update_client(&self, id: i64, input: &UpdateClientInput) -> Result<Client> {
        match &self.inner {
            Inner::Remote(store) => store.update_client(id, input).await,
            Inner::Memory(store) => store.update_client(id, input).await,
        }
    }

    pub async fn delete_client(&self, id: i64) -> Result<()> {
        match &self.inner {
            Inner::Remote(store) => store.delete_client(id).await,
            Inner::Memory(store) => store.delete_client(id).await,
        }
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.as_ref().clone()
    }

    pub fn get_user(&self, id: i64) -> Result<User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(Error::not_found("user", id))
    }
}
