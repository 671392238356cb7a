use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{json, Value};
use taskmaster::api;
use taskmaster_core::models::{Task, TaskPriority, TaskStatus};
use taskmaster_core::store::{Backend, BulkStatusOutcome, SeedData};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn seed_task(id: i64, title: &str, status: TaskStatus) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: String::new(),
        status,
        priority: TaskPriority::Medium,
        due_date: None,
        project_id: None,
        assignee: None,
        tags: Vec::new(),
        estimated_time: 0.0,
        actual_time: 0.0,
        subtasks: Vec::new(),
        created_at: day(2024, 1, 1),
        completed_at: (status == TaskStatus::Completed).then(|| day(2024, 1, 2)),
    }
}

fn server_with_tasks(tasks: Vec<Task>) -> TestServer {
    let backend = Backend::memory(SeedData {
        tasks,
        ..SeedData::default()
    });
    TestServer::new(api::create_router(backend)).expect("test server")
}

#[tokio::test]
async fn lists_tasks_and_honors_the_all_sentinel() {
    let server = server_with_tasks(vec![
        seed_task(1, "Write brief", TaskStatus::ToDo),
        seed_task(2, "Ship release", TaskStatus::Completed),
    ]);

    let all: Vec<Task> = server
        .get("/api/tasks")
        .add_query_param("status", "all")
        .await
        .json();
    assert_eq!(all.len(), 2);

    let completed: Vec<Task> = server
        .get("/api/tasks")
        .add_query_param("status", "Completed")
        .await
        .json();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, 2);
}

#[tokio::test]
async fn rejects_an_unknown_status_filter() {
    let server = server_with_tasks(Vec::new());
    let response = server
        .get("/api/tasks")
        .add_query_param("status", "Paused")
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn creating_a_task_validates_the_title() {
    let server = server_with_tasks(Vec::new());

    let rejected = server
        .post("/api/tasks")
        .json(&json!({ "title": "   " }))
        .await;
    rejected.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let created = server
        .post("/api/tasks")
        .json(&json!({ "title": "Plan sprint", "priority": "High" }))
        .await;
    created.assert_status_ok();
    let task: Task = created.json();
    assert_eq!(task.id, 1);
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.status, TaskStatus::ToDo);
}

#[tokio::test]
async fn setting_status_keeps_the_completion_invariant() {
    let server = server_with_tasks(vec![seed_task(1, "Close books", TaskStatus::ToDo)]);

    let completed: Task = server
        .post("/api/tasks/1/status")
        .json(&json!({ "status": "Completed" }))
        .await
        .json();
    assert!(completed.completed_at.is_some());

    let reopened: Task = server
        .post("/api/tasks/1/status")
        .json(&json!({ "status": "To Do" }))
        .await
        .json();
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn bulk_status_reports_partial_failure_without_erroring() {
    let server = server_with_tasks(vec![
        seed_task(1, "A", TaskStatus::ToDo),
        seed_task(3, "B", TaskStatus::Blocked),
    ]);

    let response = server
        .post("/api/tasks/bulk/status")
        .json(&json!({ "ids": [1, 2, 3], "status": "Completed" }))
        .await;
    response.assert_status_ok();
    let outcome: BulkStatusOutcome = response.json();
    assert_eq!(outcome.succeeded, vec![1, 3]);
    assert_eq!(outcome.failed, vec![2]);
}

#[tokio::test]
async fn missing_ids_map_to_not_found() {
    let server = server_with_tasks(Vec::new());
    server.get("/api/tasks/99").await.assert_status_not_found();
    server.delete("/api/tasks/99").await.assert_status_not_found();
    server.get("/api/projects/99").await.assert_status_not_found();
}

#[tokio::test]
async fn metrics_summary_uses_the_injected_reference_day() {
    let mut overdue = seed_task(1, "Late", TaskStatus::ToDo);
    overdue.due_date = Some(day(2024, 1, 2));
    let mut done = seed_task(2, "Done", TaskStatus::Completed);
    done.due_date = Some(day(2024, 1, 1));
    done.actual_time = 4.0;
    let server = server_with_tasks(vec![overdue, done]);

    let summary: Value = server
        .get("/api/metrics/summary")
        .add_query_param("today", "2024-01-05")
        .await
        .json();
    assert_eq!(summary["total_tasks"], 2);
    assert_eq!(summary["overdue_tasks"], 1);
    assert_eq!(summary["completed_tasks"], 1);
    assert_eq!(summary["completion_rate"], 50.0);
    assert_eq!(summary["total_tracked_time"], 4.0);
    assert_eq!(summary["average_time_per_completed"], 4.0);
    assert_eq!(summary["status_counts"]["to_do"], 1);
}

#[tokio::test]
async fn productivity_series_returns_one_entry_per_day() {
    let server = server_with_tasks(Vec::new());
    let series: Vec<Value> = server
        .get("/api/metrics/productivity")
        .add_query_param("days", "3")
        .add_query_param("reference", "2024-05-10")
        .await
        .json();
    assert_eq!(series.len(), 3);
    assert_eq!(series[0]["date"], "2024-05-08");
    assert_eq!(series[2]["date"], "2024-05-10");

    let rejected = server
        .get("/api/metrics/productivity")
        .add_query_param("days", "0")
        .await;
    rejected.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn month_grid_is_whole_weeks_and_validates_the_month() {
    let server = server_with_tasks(Vec::new());
    let grid: Vec<Value> = server
        .get("/api/calendar/2024/6")
        .add_query_param("today", "2024-06-15")
        .await
        .json();
    assert!(!grid.is_empty());
    assert_eq!(grid.len() % 7, 0);

    let rejected = server.get("/api/calendar/2024/13").await;
    rejected.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn week_slice_filters_by_due_date() {
    let mut inside = seed_task(1, "This week", TaskStatus::ToDo);
    inside.due_date = Some(day(2024, 6, 12));
    let mut outside = seed_task(2, "Next week", TaskStatus::ToDo);
    outside.due_date = Some(day(2024, 6, 20));
    let server = server_with_tasks(vec![inside, outside]);

    let tasks: Vec<Task> = server
        .get("/api/calendar/week")
        .add_query_param("anchor", "2024-06-12")
        .await
        .json();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, 1);
}

#[tokio::test]
async fn time_range_requires_both_bounds() {
    let server = server_with_tasks(Vec::new());
    let response = server
        .get("/api/time")
        .add_query_param("start", "2024-01-01")
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}
