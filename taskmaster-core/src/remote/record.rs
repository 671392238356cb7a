//! Canonical <-> remote record mapping.
//!
//! The remote service stores custom fields under `_c` suffixed names with
//! string-encoded sub-structures (comma-joined tags, JSON-encoded
//! subtasks). Reads are total: any missing or malformed remote value falls
//! back to a documented default instead of failing. Writes for updates
//! carry only the fields explicitly present in the input so untouched
//! remote fields are not clobbered.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::{
    normalize_tags, Client, ClientStatus, CreateClientInput, CreateProjectInput, CreateTaskInput,
    CreateTimeEntryInput, Project, Subtask, Task, TaskPriority, TaskStatus, TimeEntry,
    UpdateClientInput, UpdateProjectInput, UpdateTaskInput, UpdateTimeEntryInput,
    DEFAULT_PROJECT_COLOR,
};

/// Join tags with commas. An empty list serializes to the empty string,
/// never a literal "null".
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

/// Split a comma-joined tag string: trim each token, drop empties,
/// suppress duplicates preserving first occurrence.
pub fn split_tags(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

pub fn encode_subtasks(subtasks: &[Subtask]) -> String {
    serde_json::to_string(subtasks).unwrap_or_else(|_| "[]".to_string())
}

/// Decode a stored subtask value. A value starting with `[` is JSON; a
/// malformed JSON payload decodes to an empty list. Anything else is the
/// legacy comma-separated plain-title format, synthesized into subtasks
/// with 1-based ids.
pub fn parse_subtasks(raw: &str) -> Vec<Subtask> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).unwrap_or_default();
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .enumerate()
        .map(|(i, title)| Subtask {
            id: i as i64 + 1,
            title: title.to_string(),
            completed: false,
        })
        .collect()
}

/// Forgiving numeric parse: accepts a JSON number or numeric string,
/// defaults to 0 on anything else. Never NaN, never an error.
pub fn coerce_hours(value: Option<&Value>) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Flatten a reference value to a bare id. The service returns lookups
/// sometimes as a raw id, sometimes as an `{ "Id": ..., "Name": ... }`
/// object; nothing past this boundary sees the object form.
pub fn lookup_id(value: Option<&Value>) -> Option<i64> {
    match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Object(obj)) => obj.get("Id").and_then(Value::as_i64),
        _ => None,
    }
}

pub fn parse_day(value: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value?.trim(), "%Y-%m-%d").ok()
}

pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_timestamp(value: Option<&str>) -> DateTime<Utc> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskRecord {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id_c: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_c: Option<Value>,
    #[serde(rename = "Tags", default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time_c: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_time_c: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_c: Option<String>,
}

impl TaskRecord {
    /// Total conversion. Defaults: missing status -> To Do, missing
    /// priority -> Medium, missing times -> 0, missing creation date ->
    /// the epoch day.
    pub fn into_task(self) -> Task {
        Task {
            id: self.id.unwrap_or(0),
            title: self.title_c.unwrap_or_default(),
            description: self.description_c.unwrap_or_default(),
            status: self
                .status_c
                .as_deref()
                .and_then(TaskStatus::parse)
                .unwrap_or_default(),
            priority: self
                .priority_c
                .as_deref()
                .and_then(TaskPriority::parse)
                .unwrap_or_default(),
            due_date: parse_day(self.due_date_c.as_deref()),
            project_id: lookup_id(self.project_id_c.as_ref()),
            assignee: lookup_id(self.assignee_c.as_ref()),
            tags: self.tags.as_deref().map(split_tags).unwrap_or_default(),
            estimated_time: coerce_hours(self.estimated_time_c.as_ref()),
            actual_time: coerce_hours(self.actual_time_c.as_ref()),
            subtasks: self
                .subtasks_c
                .as_deref()
                .map(parse_subtasks)
                .unwrap_or_default(),
            created_at: parse_day(self.created_at_c.as_deref()).unwrap_or_default(),
            completed_at: parse_day(self.completed_at_c.as_deref()),
        }
    }

    /// Full record for a freshly created task. Applies the canonical
    /// defaults and the completion invariant (a task created directly in
    /// Completed gets its completion date stamped).
    pub fn from_create(input: &CreateTaskInput, today: NaiveDate) -> Self {
        let status = input.status.unwrap_or_default();
        let completed_at = (status == TaskStatus::Completed).then_some(today);
        Self {
            id: None,
            title_c: Some(input.title.trim().to_string()),
            description_c: Some(input.description.clone().unwrap_or_default()),
            status_c: Some(status.as_str().to_string()),
            priority_c: Some(input.priority.unwrap_or_default().as_str().to_string()),
            due_date_c: input.due_date.map(format_day),
            project_id_c: input.project_id.map(Value::from),
            assignee_c: input.assignee.map(Value::from),
            tags: Some(join_tags(&normalize_tags(&input.tags))),
            estimated_time_c: Some(Value::from(input.estimated_time.unwrap_or(0.0))),
            actual_time_c: Some(Value::from(0.0)),
            subtasks_c: Some(encode_subtasks(&input.subtasks)),
            created_at_c: Some(format_day(today)),
            completed_at_c: completed_at.map(format_day),
        }
    }

    /// Partial record: only fields explicitly present in the input are
    /// set, so the remote update leaves everything else untouched. The
    /// completion date is handled separately by the caller because it
    /// depends on the task's previous status.
    pub fn from_update(input: &UpdateTaskInput) -> Self {
        Self {
            id: None,
            title_c: input.title.as_deref().map(|t| t.trim().to_string()),
            description_c: input.description.clone(),
            status_c: input.status.map(|s| s.as_str().to_string()),
            priority_c: input.priority.map(|p| p.as_str().to_string()),
            due_date_c: input.due_date.map(format_day),
            project_id_c: input.project_id.map(Value::from),
            assignee_c: input.assignee.map(Value::from),
            tags: input
                .tags
                .as_deref()
                .map(|tags| join_tags(&normalize_tags(tags))),
            estimated_time_c: input.estimated_time.map(Value::from),
            actual_time_c: None,
            subtasks_c: input.subtasks.as_deref().map(encode_subtasks),
            created_at_c: None,
            completed_at_c: None,
        }
    }

    /// Full record for an existing task (create-path round-trips and cache
    /// rebuilds).
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title_c: Some(task.title.clone()),
            description_c: Some(task.description.clone()),
            status_c: Some(task.status.as_str().to_string()),
            priority_c: Some(task.priority.as_str().to_string()),
            due_date_c: task.due_date.map(format_day),
            project_id_c: task.project_id.map(Value::from),
            assignee_c: task.assignee.map(Value::from),
            tags: Some(join_tags(&task.tags)),
            estimated_time_c: Some(Value::from(task.estimated_time)),
            actual_time_c: Some(Value::from(task.actual_time)),
            subtasks_c: Some(encode_subtasks(&task.subtasks)),
            created_at_c: Some(format_day(task.created_at)),
            completed_at_c: task.completed_at.map(format_day),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRecord {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_c: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at_c: Option<String>,
    /// Legacy comma-joined task-id list. A denormalized cache only:
    /// membership is derived by scanning tasks on `project_id`, so this is
    /// never read and never written back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_c: Option<String>,
}

impl ProjectRecord {
    pub fn into_project(self) -> Project {
        Project {
            id: self.id.unwrap_or(0),
            name: self.name.unwrap_or_default(),
            description: self.description_c.unwrap_or_default(),
            color: self
                .color_c
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
            due_date: parse_day(self.due_date_c.as_deref()),
            assignee: lookup_id(self.assignee_c.as_ref()),
            created_at: parse_day(self.created_at_c.as_deref()).unwrap_or_default(),
        }
    }

    pub fn from_project(project: &Project) -> Self {
        Self {
            id: Some(project.id),
            name: Some(project.name.clone()),
            description_c: Some(project.description.clone()),
            color_c: Some(project.color.clone()),
            due_date_c: project.due_date.map(format_day),
            assignee_c: project.assignee.map(Value::from),
            created_at_c: Some(format_day(project.created_at)),
            tasks_c: None,
        }
    }

    pub fn from_create(input: &CreateProjectInput, today: NaiveDate) -> Self {
        Self {
            id: None,
            name: Some(input.name.trim().to_string()),
            description_c: Some(input.description.clone().unwrap_or_default()),
            color_c: Some(
                input
                    .color
                    .clone()
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
            ),
            due_date_c: input.due_date.map(format_day),
            assignee_c: input.assignee.map(Value::from),
            created_at_c: Some(format_day(today)),
            tasks_c: None,
        }
    }

    pub fn from_update(input: &UpdateProjectInput) -> Self {
        Self {
            id: None,
            name: input.name.as_deref().map(|n| n.trim().to_string()),
            description_c: input.description.clone(),
            color_c: input.color.clone(),
            due_date_c: input.due_date.map(format_day),
            assignee_c: input.assignee.map(Value::from),
            created_at_c: None,
            tasks_c: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_status_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_contacted_c: Option<String>,
}

impl ClientRecord {
    pub fn into_client(self) -> Client {
        let full_name = self
            .full_name_c
            .or(self.name)
            .unwrap_or_default();
        Client {
            id: self.id.unwrap_or(0),
            full_name,
            company_name: self.company_name_c.unwrap_or_default(),
            email: self.email_c.unwrap_or_default(),
            phone_number: self.phone_number_c.unwrap_or_default(),
            status: self
                .client_status_c
                .as_deref()
                .and_then(ClientStatus::parse)
                .unwrap_or_default(),
            notes: self.notes_c.unwrap_or_default(),
            created_date: parse_day(self.created_date_c.as_deref()).unwrap_or_default(),
            last_contacted: parse_day(self.last_contacted_c.as_deref()),
        }
    }

    pub fn from_create(input: &CreateClientInput, today: NaiveDate) -> Self {
        let full_name = input.full_name.trim().to_string();
        Self {
            id: None,
            name: Some(full_name.clone()),
            full_name_c: Some(full_name),
            company_name_c: Some(input.company_name.clone().unwrap_or_default()),
            email_c: Some(input.email.clone().unwrap_or_default()),
            phone_number_c: Some(input.phone_number.clone().unwrap_or_default()),
            client_status_c: Some(input.status.unwrap_or_default().as_str().to_string()),
            notes_c: Some(input.notes.clone().unwrap_or_default()),
            created_date_c: Some(format_day(today)),
            last_contacted_c: input.last_contacted.map(format_day),
        }
    }

    pub fn from_update(input: &UpdateClientInput) -> Self {
        let full_name = input.full_name.as_deref().map(|n| n.trim().to_string());
        Self {
            id: None,
            name: full_name.clone(),
            full_name_c: full_name,
            company_name_c: input.company_name.clone(),
            email_c: input.email.clone(),
            phone_number_c: input.phone_number.clone(),
            client_status_c: input.status.map(|s| s.as_str().to_string()),
            notes_c: input.notes.clone(),
            created_date_c: None,
            last_contacted_c: input.last_contacted.map(format_day),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeEntryRecord {
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id_c: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_c: Option<Value>,
}

impl TimeEntryRecord {
    pub fn into_time_entry(self) -> TimeEntry {
        TimeEntry {
            id: self.id.unwrap_or(0),
            task_id: lookup_id(self.task_id_c.as_ref()).unwrap_or(0),
            start_time: parse_timestamp(self.start_time_c.as_deref()),
            end_time: parse_timestamp(self.end_time_c.as_deref()),
            duration: coerce_hours(self.duration_c.as_ref()),
        }
    }

    pub fn from_create(task_id: i64, input: &CreateTimeEntryInput, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            task_id_c: Some(Value::from(task_id)),
            start_time_c: Some(input.start_time.unwrap_or(now).to_rfc3339()),
            end_time_c: Some(input.end_time.unwrap_or(now).to_rfc3339()),
            duration_c: Some(Value::from(input.duration)),
        }
    }

    pub fn from_update(input: &UpdateTimeEntryInput) -> Self {
        Self {
            id: None,
            task_id_c: None,
            start_time_c: input.start_time.map(|t| t.to_rfc3339()),
            end_time_c: input.end_time.map(|t| t.to_rfc3339()),
            duration_c: input.duration.map(Value::from),
        }
    }
}
