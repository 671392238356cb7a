//! Client for the remote record service.
//!
//! The service exposes generic fetch/get/create/update/delete verbs over
//! named tables; entity semantics live entirely in the record mapping
//! ([`record`]). All operations are async and fallible: connection-level
//! failures surface as [`Error::Unavailable`] with a human-readable
//! message, missing targets as [`Error::NotFound`].

pub mod record;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{
    Client, ClientQuery, CreateClientInput, CreateProjectInput, CreateTaskInput,
    CreateTimeEntryInput, Project, Task, TaskPriority, TaskStatus, TimeEntry, UpdateClientInput,
    UpdateProjectInput, UpdateTaskInput, UpdateTimeEntryInput,
};
use record::{
    format_day, ClientRecord, ProjectRecord, TaskRecord, TimeEntryRecord,
};

pub const TASK_TABLE: &str = "task_c";
pub const PROJECT_TABLE: &str = "project_c";
pub const CLIENT_TABLE: &str = "client_c";
pub const TIME_ENTRY_TABLE: &str = "time_entry_c";

const TASK_FIELDS: &[&str] = &[
    "Id",
    "title_c",
    "description_c",
    "status_c",
    "priority_c",
    "due_date_c",
    "project_id_c",
    "assignee_c",
    "Tags",
    "estimated_time_c",
    "actual_time_c",
    "subtasks_c",
    "created_at_c",
    "completed_at_c",
];

const PROJECT_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "description_c",
    "color_c",
    "due_date_c",
    "assignee_c",
    "created_at_c",
];

const CLIENT_FIELDS: &[&str] = &[
    "Id",
    "Name",
    "full_name_c",
    "company_name_c",
    "email_c",
    "phone_number_c",
    "client_status_c",
    "notes_c",
    "created_date_c",
    "last_contacted_c",
];

const TIME_ENTRY_FIELDS: &[&str] = &[
    "Id",
    "task_id_c",
    "start_time_c",
    "end_time_c",
    "duration_c",
];

#[derive(Debug, Clone, Serialize)]
struct FieldSpec {
    field: FieldName,
}

#[derive(Debug, Clone, Serialize)]
struct FieldName {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Clone, Serialize)]
struct WhereClause {
    #[serde(rename = "FieldName")]
    field_name: String,
    #[serde(rename = "Operator")]
    operator: String,
    #[serde(rename = "Values")]
    values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct WhereGroup {
    operator: String,
    #[serde(rename = "subGroups")]
    sub_groups: Vec<SubGroup>,
}

#[derive(Debug, Clone, Serialize)]
struct SubGroup {
    operator: String,
    conditions: Vec<Condition>,
}

#[derive(Debug, Clone, Serialize)]
struct Condition {
    #[serde(rename = "fieldName")]
    field_name: String,
    operator: String,
    values: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct OrderBy {
    #[serde(rename = "fieldName")]
    field_name: String,
    #[serde(rename = "sorttype")]
    sort_type: String,
}

#[derive(Debug, Clone, Copy, Serialize)]
struct Paging {
    limit: u32,
    offset: u32,
}

/// Query body for `fetch_records`, mirroring the service's parameter
/// shape: selected fields, AND-ed where clauses, optional OR search
/// groups, ordering, and paging.
#[derive(Debug, Clone, Serialize)]
pub struct QueryParams {
    fields: Vec<FieldSpec>,
    #[serde(rename = "where")]
    filters: Vec<WhereClause>,
    #[serde(rename = "whereGroups", skip_serializing_if = "Vec::is_empty")]
    where_groups: Vec<WhereGroup>,
    #[serde(rename = "orderBy")]
    order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo")]
    paging: Paging,
}

impl QueryParams {
    pub fn select(fields: &[&str]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|name| FieldSpec {
                    field: FieldName {
                        name: (*name).to_string(),
                    },
                })
                .collect(),
            filters: Vec::new(),
            where_groups: Vec::new(),
            order_by: Vec::new(),
            paging: Paging {
                limit: 200,
                offset: 0,
            },
        }
    }

    pub fn filter_eq(mut self, field: &str, value: impl ToString) -> Self {
        self.filters.push(WhereClause {
            field_name: field.to_string(),
            operator: "EqualTo".to_string(),
            values: vec![value.to_string()],
        });
        self
    }

    /// Case-insensitive contains-match of `term` against any of `fields`.
    pub fn search(mut self, fields: &[&str], term: &str) -> Self {
        self.where_groups.push(WhereGroup {
            operator: "OR".to_string(),
            sub_groups: vec![SubGroup {
                operator: "OR".to_string(),
                conditions: fields
                    .iter()
                    .map(|field| Condition {
                        field_name: (*field).to_string(),
                        operator: "Contains".to_string(),
                        values: vec![term.to_string()],
                    })
                    .collect(),
            }],
        });
        self
    }

    pub fn order_by_id_desc(mut self) -> Self {
        self.order_by.push(OrderBy {
            field_name: "Id".to_string(),
            sort_type: "DESC".to_string(),
        });
        self
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    message: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Thin HTTP client carrying the credential pair on every request.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    project_id: String,
    public_key: String,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>, project_id: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            public_key: public_key.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(reqwest::StatusCode, Envelope)> {
        let response = request
            .header("X-Project-Id", &self.project_id)
            .header("X-Public-Key", &self.public_key)
            .send()
            .await
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        let status = response.status();
        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        Ok((status, envelope))
    }

    fn check(status: reqwest::StatusCode, envelope: &Envelope) -> Result<()> {
        if status.is_success() && envelope.success {
            return Ok(());
        }
        let message = envelope
            .message
            .clone()
            .unwrap_or_else(|| format!("request failed with status {status}"));
        tracing::warn!(%status, message, "record service refused request");
        Err(Error::Unavailable(message))
    }

    pub async fn fetch_records(&self, table: &str, params: &QueryParams) -> Result<Vec<Value>> {
        let request = self
            .http
            .post(self.url(&format!("api/records/{table}/fetch")))
            .json(params);
        let (status, envelope) = self.send(request).await?;
        Self::check(status, &envelope)?;
        match envelope.data {
            Value::Array(items) => Ok(items),
            Value::Null => Ok(Vec::new()),
            other => Ok(vec![other]),
        }
    }

    pub async fn get_record_by_id(&self, table: &str, id: i64) -> Result<Option<Value>> {
        let request = self.http.get(self.url(&format!("api/records/{table}/{id}")));
        let (status, envelope) = self.send(request).await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Self::check(status, &envelope)?;
        match envelope.data {
            Value::Null => Ok(None),
            data => Ok(Some(data)),
        }
    }

    pub async fn create_record(&self, table: &str, record: Value) -> Result<Value> {
        let request = self
            .http
            .post(self.url(&format!("api/records/{table}")))
            .json(&record);
        let (status, envelope) = self.send(request).await?;
        Self::check(status, &envelope)?;
        Ok(envelope.data)
    }

    pub async fn update_record(&self, table: &str, id: i64, record: Value) -> Result<Value> {
        let request = self
            .http
            .patch(self.url(&format!("api/records/{table}/{id}")))
            .json(&record);
        let (status, envelope) = self.send(request).await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::Unavailable(
                envelope
                    .message
                    .unwrap_or_else(|| format!("record {id} not found in {table}")),
            ));
        }
        Self::check(status, &envelope)?;
        Ok(envelope.data)
    }

    pub async fn delete_record(&self, table: &str, id: i64) -> Result<bool> {
        let request = self
            .http
            .delete(self.url(&format!("api/records/{table}/{id}")));
        let (status, envelope) = self.send(request).await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        Self::check(status, &envelope)?;
        Ok(true)
    }
}

fn to_object(record: impl Serialize) -> Result<Value> {
    serde_json::to_value(record).map_err(|e| Error::Unavailable(e.to_string()))
}

fn task_from_value(value: Value) -> Task {
    serde_json::from_value::<TaskRecord>(value)
        .unwrap_or_default()
        .into_task()
}

fn project_from_value(value: Value) -> Project {
    serde_json::from_value::<ProjectRecord>(value)
        .unwrap_or_default()
        .into_project()
}

fn client_from_value(value: Value) -> Client {
    serde_json::from_value::<ClientRecord>(value)
        .unwrap_or_default()
        .into_client()
}

fn entry_from_value(value: Value) -> TimeEntry {
    serde_json::from_value::<TimeEntryRecord>(value)
        .unwrap_or_default()
        .into_time_entry()
}

/// Typed operations over the remote tables. Each method normalizes at the
/// boundary in both directions; callers only ever see canonical shapes.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: RemoteClient,
}

impl RemoteStore {
    pub fn new(client: RemoteClient) -> Self {
        Self { client }
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let params = QueryParams::select(TASK_FIELDS).order_by_id_desc();
        let items = self.client.fetch_records(TASK_TABLE, &params).await?;
        Ok(items.into_iter().map(task_from_value).collect())
    }

    pub async fn get_task(&self, id: i64) -> Result<Task> {
        match self.client.get_record_by_id(TASK_TABLE, id).await? {
            Some(value) => Ok(task_from_value(value)),
            None => Err(Error::not_found("task", id)),
        }
    }

    pub async fn tasks_by_project(&self, project_id: i64) -> Result<Vec<Task>> {
        let params = QueryParams::select(TASK_FIELDS).filter_eq("project_id_c", project_id);
        let items = self.client.fetch_records(TASK_TABLE, &params).await?;
        Ok(items.into_iter().map(task_from_value).collect())
    }

    pub async fn tasks_by_status(&self, status: TaskStatus) -> Result<Vec<Task>> {
        let params = QueryParams::select(TASK_FIELDS).filter_eq("status_c", status.as_str());
        let items = self.client.fetch_records(TASK_TABLE, &params).await?;
        Ok(items.into_iter().map(task_from_value).collect())
    }

    pub async fn tasks_by_priority(&self, priority: TaskPriority) -> Result<Vec<Task>> {
        let params = QueryParams::select(TASK_FIELDS).filter_eq("priority_c", priority.as_str());
        let items = self.client.fetch_records(TASK_TABLE, &params).await?;
        Ok(items.into_iter().map(task_from_value).collect())
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> Result<Task> {
        let today = Utc::now().date_naive();
        let record = to_object(TaskRecord::from_create(input, today))?;
        let created = self.client.create_record(TASK_TABLE, record).await?;
        Ok(task_from_value(created))
    }

    /// Partial update. The completion date depends on the previous status,
    /// so the current record is read first and the transition applied
    /// explicitly: entering Completed stamps today, leaving Completed
    /// clears the date, staying Completed leaves it untouched.
    pub async fn update_task(&self, id: i64, input: &UpdateTaskInput) -> Result<Task> {
        let current = self.get_task(id).await?;
        let mut record = to_object(TaskRecord::from_update(input))?;
        if let (Some(status), Some(fields)) = (input.status, record.as_object_mut()) {
            let was_completed = current.status == TaskStatus::Completed;
            if status == TaskStatus::Completed {
                if !was_completed {
                    let today = Utc::now().date_naive();
                    fields.insert("completed_at_c".into(), Value::String(format_day(today)));
                }
            } else {
                fields.insert("completed_at_c".into(), Value::Null);
            }
        }
        let updated = self.client.update_record(TASK_TABLE, id, record).await?;
        Ok(task_from_value(updated))
    }

    pub async fn delete_task(&self, id: i64) -> Result<()> {
        if self.client.delete_record(TASK_TABLE, id).await? {
            Ok(())
        } else {
            Err(Error::not_found("task", id))
        }
    }

    /// Records a tracked interval and folds its duration into the task's
    /// accumulated time in the same operation.
    pub async fn add_time_entry(&self, task_id: i64, input: &CreateTimeEntryInput) -> Result<Task> {
        let task = self.get_task(task_id).await?;
        let record = to_object(TimeEntryRecord::from_create(task_id, input, Utc::now()))?;
        self.client.create_record(TIME_ENTRY_TABLE, record).await?;

        let total = task.actual_time + input.duration;
        let patch = serde_json::json!({ "actual_time_c": total });
        let updated = self.client.update_record(TASK_TABLE, task_id, patch).await?;
        Ok(task_from_value(updated))
    }

    pub async fn list_time_entries(&self) -> Result<Vec<TimeEntry>> {
        let params = QueryParams::select(TIME_ENTRY_FIELDS);
        let items = self.client.fetch_records(TIME_ENTRY_TABLE, &params).await?;
        Ok(items.into_iter().map(entry_from_value).collect())
    }

    pub async fn entries_for_task(&self, task_id: i64) -> Result<Vec<TimeEntry>> {
        let params = QueryParams::select(TIME_ENTRY_FIELDS).filter_eq("task_id_c", task_id);
        let items = self.client.fetch_records(TIME_ENTRY_TABLE, &params).await?;
        Ok(items.into_iter().map(entry_from_value).collect())
    }

    pub async fn update_time_entry(&self, id: i64, input: &UpdateTimeEntryInput) -> Result<TimeEntry> {
        let record = to_object(TimeEntryRecord::from_update(input))?;
        let updated = self.client.update_record(TIME_ENTRY_TABLE, id, record).await?;
        Ok(entry_from_value(updated))
    }

    pub async fn delete_time_entry(&self, id: i64) -> Result<()> {
        if self.client.delete_record(TIME_ENTRY_TABLE, id).await? {
            Ok(())
        } else {
            Err(Error::not_found("time entry", id))
        }
    }

    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        let params = QueryParams::select(PROJECT_FIELDS).order_by_id_desc();
        let items = self.client.fetch_records(PROJECT_TABLE, &params).await?;
        Ok(items.into_iter().map(project_from_value).collect())
    }

    pub async fn get_project(&self, id: i64) -> Result<Project> {
        match self.client.get_record_by_id(PROJECT_TABLE, id).await? {
            Some(value) => Ok(project_from_value(value)),
            None => Err(Error::not_found("project", id)),
        }
    }

    pub async fn create_project(&self, input: &CreateProjectInput) -> Result<Project> {
        let today = Utc::now().date_naive();
        let record = to_object(ProjectRecord::from_create(input, today))?;
        let created = self.client.create_record(PROJECT_TABLE, record).await?;
        Ok(project_from_value(created))
    }

    pub async fn update_project(&self, id: i64, input: &UpdateProjectInput) -> Result<Project> {
        // Ensure the target exists so a missing id maps to NotFound
        // rather than whatever the service reports.
        self.get_project(id).await?;
        let record = to_object(ProjectRecord::from_update(input))?;
        let updated = self.client.update_record(PROJECT_TABLE, id, record).await?;
        Ok(project_from_value(updated))
    }

    /// Deleting a project never cascades: its tasks keep their
    /// `project_id` and are left in place.
    pub async fn delete_project(&self, id: i64) -> Result<()> {
        if self.client.delete_record(PROJECT_TABLE, id).await? {
            Ok(())
        } else {
            Err(Error::not_found("project", id))
        }
    }

    pub async fn list_clients(&self, query: &ClientQuery) -> Result<Vec<Client>> {
        let mut params = QueryParams::select(CLIENT_FIELDS).order_by_id_desc();
        if let Some(term) = query.search.as_deref().map(str::trim) {
            if !term.is_empty() {
                params = params.search(&["full_name_c", "company_name_c", "email_c"], term);
            }
        }
        if let Some(status) = query.status {
            params = params.filter_eq("client_status_c", status.as_str());
        }
        let items = self.client.fetch_records(CLIENT_TABLE, &params).await?;
        Ok(items.into_iter().map(client_from_value).collect())
    }

    pub async fn get_client(&self, id: i64) -> Result<Client> {
        match self.client.get_record_by_id(CLIENT_TABLE, id).await? {
            Some(value) => Ok(client_from_value(value)),
            None => Err(Error::not_found("client", id)),
        }
    }

    pub async fn create_client(&self, input: &CreateClientInput) -> Result<Client> {
        let today = Utc::now().date_naive();
        let record = to_object(ClientRecord::from_create(input, today))?;
        let created = self.client.create_record(CLIENT_TABLE, record).await?;
        Ok(client_from_value(created))
    }

    pub async fn update_client(&self, id: i64, input: &UpdateClientInput) -> Result<Client> {
        self.get_client(id).await?;
        let record = to_object(ClientRecord::from_update(input))?;
        let updated = self.client.update_record(CLIENT_TABLE, id, record).await?;
        Ok(client_from_value(updated))
    }

    pub async fn delete_client(&self, id: i64) -> Result<()> {
        if self.client.delete_record(CLIENT_TABLE, id).await? {
            Ok(())
        } else {
            Err(Error::not_found("client", id))
        }
    }
}
