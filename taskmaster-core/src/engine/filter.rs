use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskPriority, TaskStatus};

/// Conjunction of optional task predicates. `None` means "no filter" for
/// that dimension (the HTTP layer maps the literal query value `all` and
/// empty strings to `None`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    pub search: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project_id: Option<i64>,
    pub assignee: Option<i64>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().map_or(true, |s| s.trim().is_empty())
            && self.status.is_none()
            && self.priority.is_none()
            && self.project_id.is_none()
            && self.assignee.is_none()
    }

    /// A task with a null field being filtered on never matches a concrete
    /// value - it only passes when that dimension is unfiltered.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                let needle = search.to_lowercase();
                let hit = task.title.to_lowercase().contains(&needle)
                    || task.description.to_lowercase().contains(&needle);
                if !hit {
                    return false;
                }
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(project_id) = self.project_id {
            if task.project_id != Some(project_id) {
                return false;
            }
        }
        if let Some(assignee) = self.assignee {
            if task.assignee != Some(assignee) {
                return false;
            }
        }
        true
    }
}

/// Order-preserving, non-mutating filter pass. Calling this twice with the
/// same inputs yields the same output.
pub fn filter_tasks(tasks: &[Task], filter: &TaskFilter) -> Vec<Task> {
    tasks.iter().filter(|t| filter.matches(t)).cloned().collect()
}
