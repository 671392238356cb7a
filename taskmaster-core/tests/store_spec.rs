use speculate2::speculate;

speculate! {
    use std::io::Write;

    use chrono::{NaiveDate, Utc};
    use taskmaster_core::models::{
        CreateProjectInput, CreateTaskInput, CreateTimeEntryInput, Task, TaskPriority,
        TaskStatus, UpdateTaskInput, User,
    };
    use taskmaster_core::store::{Backend, SeedData};
    use taskmaster_core::Error;
    use tokio_test::block_on;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn seed_task(id: i64, status: TaskStatus) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
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
            completed_at: (status == TaskStatus::Completed).then(|| day(2024, 1, 1)),
        }
    }

    fn backend_with_tasks(tasks: Vec<Task>) -> Backend {
        Backend::memory(SeedData {
            tasks,
            users: vec![User {
                id: 1,
                name: "Alex".into(),
                role: "Engineer".into(),
            }],
            ..SeedData::default()
        })
    }

    describe "task lifecycle" {
        it "assigns the next id above the current maximum" {
            let backend = backend_with_tasks(vec![seed_task(4, TaskStatus::ToDo)]);
            let created = block_on(backend.create_task(&CreateTaskInput {
                title: "New".into(),
                description: None,
                status: None,
                priority: None,
                due_date: None,
                project_id: None,
                assignee: None,
                tags: vec!["a".into(), " a ".into(), "b".into()],
                estimated_time: None,
                subtasks: Vec::new(),
            }))
            .expect("create");
            assert_eq!(created.id, 5);
            assert_eq!(created.status, TaskStatus::ToDo);
            assert_eq!(created.tags, vec!["a", "b"], "duplicate tags are suppressed");
            assert_eq!(created.created_at, Utc::now().date_naive());
            assert!(created.completed_at.is_none());
        }

        it "stamps the completion date when created directly as completed" {
            let backend = backend_with_tasks(Vec::new());
            let created = block_on(backend.create_task(&CreateTaskInput {
                title: "Done on arrival".into(),
                description: None,
                status: Some(TaskStatus::Completed),
                priority: None,
                due_date: None,
                project_id: None,
                assignee: None,
                tags: Vec::new(),
                estimated_time: None,
                subtasks: Vec::new(),
            }))
            .expect("create");
            assert_eq!(created.completed_at, Some(Utc::now().date_naive()));
        }

        it "keeps the completion date in lockstep with status across updates" {
            let backend = backend_with_tasks(vec![seed_task(1, TaskStatus::ToDo)]);

            let completed = block_on(backend.set_status(1, TaskStatus::Completed)).expect("complete");
            assert_eq!(completed.completed_at, Some(Utc::now().date_naive()));

            // A non-status update leaves the completion date alone.
            let renamed = block_on(backend.update_task(1, &UpdateTaskInput {
                title: Some("Renamed".into()),
                ..UpdateTaskInput::default()
            }))
            .expect("rename");
            assert!(renamed.completed_at.is_some());

            let reopened = block_on(backend.set_status(1, TaskStatus::InProgress)).expect("reopen");
            assert!(reopened.completed_at.is_none());
        }

        it "surfaces not-found for get, update, and delete" {
            let backend = backend_with_tasks(Vec::new());
            assert!(matches!(
                block_on(backend.get_task(42)),
                Err(Error::NotFound { .. })
            ));
            assert!(matches!(
                block_on(backend.update_task(42, &UpdateTaskInput::default())),
                Err(Error::NotFound { .. })
            ));
            assert!(matches!(
                block_on(backend.delete_task(42)),
                Err(Error::NotFound { .. })
            ));
        }

        it "lists tasks by project, status, and priority" {
            let mut member = seed_task(1, TaskStatus::ToDo);
            member.project_id = Some(7);
            let mut urgent = seed_task(2, TaskStatus::InProgress);
            urgent.priority = TaskPriority::Urgent;
            let backend = backend_with_tasks(vec![member, urgent]);

            let by_project = block_on(backend.tasks_by_project(7)).expect("by project");
            assert_eq!(by_project.len(), 1);
            assert_eq!(by_project[0].id, 1);

            let by_status = block_on(backend.tasks_by_status(TaskStatus::InProgress))
                .expect("by status");
            assert_eq!(by_status.len(), 1);
            assert_eq!(by_status[0].id, 2);

            let by_priority = block_on(backend.tasks_by_priority(TaskPriority::Urgent))
                .expect("by priority");
            assert_eq!(by_priority.len(), 1);
            assert_eq!(by_priority[0].id, 2);
        }

        it "filters overdue tasks by the injected day" {
            let mut due_past = seed_task(1, TaskStatus::ToDo);
            due_past.due_date = Some(day(2024, 1, 2));
            let mut done_past = seed_task(2, TaskStatus::Completed);
            done_past.due_date = Some(day(2024, 1, 1));
            let backend = backend_with_tasks(vec![due_past, done_past]);

            let overdue = block_on(backend.overdue_tasks(day(2024, 1, 5))).expect("overdue");
            assert_eq!(overdue.len(), 1);
            assert_eq!(overdue[0].id, 1);
        }
    }

    describe "bulk status updates" {
        it "keeps successes when individual ids fail" {
            let backend = backend_with_tasks(vec![
                seed_task(1, TaskStatus::ToDo),
                seed_task(3, TaskStatus::InProgress),
            ]);
            let outcome = block_on(backend.bulk_update_status(&[1, 2, 3], TaskStatus::Completed))
                .expect("partial failure is a result, not an error");
            assert_eq!(outcome.succeeded, vec![1, 3]);
            assert_eq!(outcome.failed, vec![2]);

            let today = Utc::now().date_naive();
            let first = block_on(backend.get_task(1)).expect("task 1");
            let third = block_on(backend.get_task(3)).expect("task 3");
            assert_eq!(first.completed_at, Some(today));
            assert_eq!(third.completed_at, Some(today));
        }

        it "returns an empty outcome for an empty id set" {
            let backend = backend_with_tasks(Vec::new());
            let outcome = block_on(backend.bulk_update_status(&[], TaskStatus::Completed))
                .expect("empty batch");
            assert!(outcome.succeeded.is_empty());
            assert!(outcome.failed.is_empty());
        }

        it "is idempotent for a repeated target status" {
            let backend = backend_with_tasks(vec![seed_task(1, TaskStatus::ToDo)]);
            block_on(backend.bulk_update_status(&[1], TaskStatus::Completed)).expect("first");
            let outcome =
                block_on(backend.bulk_update_status(&[1], TaskStatus::Completed)).expect("second");
            assert_eq!(outcome.succeeded, vec![1]);
        }
    }

    describe "time tracking" {
        it "accumulates tracked hours onto the task" {
            let backend = backend_with_tasks(vec![seed_task(1, TaskStatus::InProgress)]);
            let input = CreateTimeEntryInput {
                start_time: None,
                end_time: None,
                duration: 2.5,
            };
            let updated = block_on(backend.add_time_entry(1, &input)).expect("entry");
            assert_eq!(updated.actual_time, 2.5);

            let again = block_on(backend.add_time_entry(1, &input)).expect("entry");
            assert_eq!(again.actual_time, 5.0);

            let entries = block_on(backend.entries_for_task(1)).expect("entries");
            assert_eq!(entries.len(), 2);
            let total = block_on(backend.total_time_for_task(1)).expect("total");
            assert_eq!(total, 5.0);
        }

        it "refuses entries against a missing task" {
            let backend = backend_with_tasks(Vec::new());
            let input = CreateTimeEntryInput {
                start_time: None,
                end_time: None,
                duration: 1.0,
            };
            assert!(matches!(
                block_on(backend.add_time_entry(9, &input)),
                Err(Error::NotFound { .. })
            ));
        }

        it "slices entries by start day inclusively" {
            let backend = backend_with_tasks(vec![seed_task(1, TaskStatus::ToDo)]);
            for (start, duration) in [
                ("2024-03-01T09:00:00Z", 1.0),
                ("2024-03-05T09:00:00Z", 2.0),
                ("2024-03-09T09:00:00Z", 3.0),
            ] {
                let input = CreateTimeEntryInput {
                    start_time: Some(start.parse().expect("timestamp")),
                    end_time: None,
                    duration,
                };
                block_on(backend.add_time_entry(1, &input)).expect("entry");
            }
            let entries =
                block_on(backend.entries_in_range(day(2024, 3, 1), day(2024, 3, 5)))
                    .expect("range");
            let durations: Vec<f64> = entries.iter().map(|e| e.duration).collect();
            assert_eq!(durations, vec![1.0, 2.0]);
        }
    }

    describe "projects" {
        it "does not cascade task deletion when a project is removed" {
            let mut member = seed_task(1, TaskStatus::ToDo);
            member.project_id = Some(1);
            let backend = Backend::memory(SeedData {
                tasks: vec![member],
                projects: vec![],
                ..SeedData::default()
            });
            let project = block_on(backend.create_project(&CreateProjectInput {
                name: "Doomed".into(),
                description: None,
                color: None,
                due_date: None,
                assignee: None,
            }))
            .expect("project");
            block_on(backend.delete_project(project.id)).expect("delete");

            let survivor = block_on(backend.get_task(1)).expect("task survives");
            assert_eq!(survivor.project_id, Some(1));
        }

        it "falls back to the default color" {
            let backend = backend_with_tasks(Vec::new());
            let project = block_on(backend.create_project(&CreateProjectInput {
                name: "Plain".into(),
                description: None,
                color: Some("  ".into()),
                due_date: None,
                assignee: None,
            }))
            .expect("project");
            assert_eq!(project.color, "#3b82f6");
        }
    }

    describe "seed loading" {
        it "loads a seed file from disk" {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            write!(
                file,
                r#"{{"tasks": [], "users": [{{"id": 7, "name": "Ada", "role": "Lead"}}]}}"#
            )
            .expect("write seed");
            let seed = SeedData::from_path(file.path()).expect("seed parses");
            assert_eq!(seed.users.len(), 1);
            assert!(seed.tasks.is_empty());

            let backend = Backend::memory(seed);
            assert_eq!(backend.get_user(7).expect("user").name, "Ada");
        }

        it "rejects a malformed seed file with a readable error" {
            let mut file = tempfile::NamedTempFile::new().expect("temp file");
            write!(file, "not json").expect("write seed");
            assert!(matches!(
                SeedData::from_path(file.path()),
                Err(Error::Invalid(_))
            ));
        }

        it "serves users from the seed set" {
            let backend = backend_with_tasks(Vec::new());
            let users = backend.list_users();
            assert_eq!(users.len(), 1);
            assert!(matches!(
                backend.get_user(99),
                Err(Error::NotFound { .. })
            ));
        }
    }
}
