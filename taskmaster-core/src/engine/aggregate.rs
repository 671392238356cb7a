use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Project, Task, TaskPriority, TaskStatus};

/// Per-status task counts. Zero entries are reported; callers decide
/// whether to hide them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub to_do: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub blocked: usize,
}

impl StatusCounts {
    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::ToDo => self.to_do,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
            TaskStatus::Blocked => self.blocked,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriorityCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub urgent: usize,
}

impl PriorityCounts {
    pub fn get(&self, priority: TaskPriority) -> usize {
        match priority {
            TaskPriority::Low => self.low,
            TaskPriority::Medium => self.medium,
            TaskPriority::High => self.high,
            TaskPriority::Urgent => self.urgent,
        }
    }
}

pub fn status_counts(tasks: &[Task]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for task in tasks {
        match task.status {
            TaskStatus::ToDo => counts.to_do += 1,
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Completed => counts.completed += 1,
            TaskStatus::Blocked => counts.blocked += 1,
        }
    }
    counts
}

pub fn priority_counts(tasks: &[Task]) -> PriorityCounts {
    let mut counts = PriorityCounts::default();
    for task in tasks {
        match task.priority {
            TaskPriority::Low => counts.low += 1,
            TaskPriority::Medium => counts.medium += 1,
            TaskPriority::High => counts.high += 1,
            TaskPriority::Urgent => counts.urgent += 1,
        }
    }
    counts
}

/// Completed share in percent. Exactly 0 for an empty scope.
pub fn completion_rate(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.is_completed()).count();
    completed as f64 / tasks.len() as f64 * 100.0
}

/// `today` is injected rather than read from a clock so callers and tests
/// control the reference day.
pub fn overdue_count(tasks: &[Task], today: NaiveDate) -> usize {
    tasks.iter().filter(|t| t.is_overdue(today)).count()
}

pub fn total_tracked_time(tasks: &[Task]) -> f64 {
    tasks.iter().map(|t| t.actual_time).sum()
}

/// Mean tracked hours across completed tasks; 0 when none are completed.
pub fn average_time_per_completed(tasks: &[Task]) -> f64 {
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();
    if completed.is_empty() {
        return 0.0;
    }
    completed.iter().map(|t| t.actual_time).sum::<f64>() / completed.len() as f64
}

/// Number of tasks with any tracked time at all.
pub fn tracked_task_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.actual_time > 0.0).count()
}

/// Tasks due exactly on `date`, in input order.
pub fn due_on(tasks: &[Task], date: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| t.due_date == Some(date))
        .cloned()
        .collect()
}

/// Most recently created tasks first, capped at `limit`. Ties keep their
/// relative input order.
pub fn recent_activity(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut recent: Vec<Task> = tasks.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(limit);
    recent
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectProgress {
    pub project_id: i64,
    pub name: String,
    pub task_count: usize,
    pub completed_count: usize,
    /// Percent complete, 0 for a project with no tasks.
    pub progress: f64,
}

/// Membership is derived by scanning tasks on `project_id`; any stored
/// membership list on the remote project record is ignored.
pub fn project_progress(project: &Project, tasks: &[Task]) -> ProjectProgress {
    let member_count = tasks
        .iter()
        .filter(|t| t.project_id == Some(project.id))
        .count();
    let completed_count = tasks
        .iter()
        .filter(|t| t.project_id == Some(project.id) && t.is_completed())
        .count();
    let progress = if member_count > 0 {
        completed_count as f64 / member_count as f64 * 100.0
    } else {
        0.0
    };
    ProjectProgress {
        project_id: project.id,
        name: project.name.clone(),
        task_count: member_count,
        completed_count,
        progress,
    }
}

/// Progress for every project, sorted by progress descending. The sort is
/// stable: equal progress keeps the projects' relative input order.
pub fn rank_projects(projects: &[Project], tasks: &[Task]) -> Vec<ProjectProgress> {
    let mut ranked: Vec<ProjectProgress> = projects
        .iter()
        .map(|p| project_progress(p, tasks))
        .collect();
    ranked.sort_by(|a, b| b.progress.total_cmp(&a.progress));
    ranked
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyProductivity {
    pub date: NaiveDate,
    pub completed_count: usize,
    pub created_count: usize,
}

/// Lazy, finite, restartable walk over the last `days` calendar days ending
/// at `reference` inclusive, oldest first. A task counts for a day only on
/// exact day equality of its completion/creation date.
pub fn productivity_series<'a>(
    tasks: &'a [Task],
    days: u32,
    reference: NaiveDate,
) -> ProductivitySeries<'a> {
    let start = reference
        .checked_sub_days(Days::new(days.saturating_sub(1) as u64))
        .unwrap_or(NaiveDate::MIN);
    ProductivitySeries {
        tasks,
        next: start,
        remaining: days,
    }
}

#[derive(Debug, Clone)]
pub struct ProductivitySeries<'a> {
    tasks: &'a [Task],
    next: NaiveDate,
    remaining: u32,
}

impl Iterator for ProductivitySeries<'_> {
    type Item = DailyProductivity;

    fn next(&mut self) -> Option<DailyProductivity> {
        if self.remaining == 0 {
            return None;
        }
        let date = self.next;
        let completed_count = self
            .tasks
            .iter()
            .filter(|t| t.completed_at == Some(date))
            .count();
        let created_count = self.tasks.iter().filter(|t| t.created_at == date).count();
        self.remaining -= 1;
        if let Some(next) = date.succ_opt() {
            self.next = next;
        } else {
            self.remaining = 0;
        }
        Some(DailyProductivity {
            date,
            completed_count,
            created_count,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ProductivitySeries<'_> {}
