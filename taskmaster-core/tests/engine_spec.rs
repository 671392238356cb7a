use speculate2::speculate;

speculate! {
    use chrono::NaiveDate;
    use taskmaster_core::engine;
    use taskmaster_core::engine::TaskFilter;
    use taskmaster_core::models::{Project, Task, TaskPriority, TaskStatus};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task(id: i64, status: TaskStatus) -> Task {
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

    fn project(id: i64, name: &str) -> Project {
        Project {
            id,
            name: name.to_string(),
            description: String::new(),
            color: "#3b82f6".to_string(),
            due_date: None,
            assignee: None,
            created_at: day(2024, 1, 1),
        }
    }

    fn sample() -> Vec<Task> {
        let mut t1 = task(1, TaskStatus::ToDo);
        t1.title = "Write launch email".into();
        t1.priority = TaskPriority::High;
        t1.project_id = Some(10);
        t1.assignee = Some(1);
        let mut t2 = task(2, TaskStatus::InProgress);
        t2.description = "Fix the EMAIL template".into();
        t2.project_id = Some(11);
        let t3 = task(3, TaskStatus::Completed);
        vec![t1, t2, t3]
    }

    describe "task filtering" {
        it "returns the input unchanged for the identity filter" {
            let tasks = sample();
            let filter = TaskFilter {
                search: Some(String::new()),
                ..TaskFilter::default()
            };
            let filtered = engine::filter_tasks(&tasks, &filter);
            let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![1, 2, 3]);
            assert!(filter.is_empty());
        }

        it "is idempotent" {
            let tasks = sample();
            let filter = TaskFilter {
                search: Some("email".into()),
                ..TaskFilter::default()
            };
            let once = engine::filter_tasks(&tasks, &filter);
            let twice = engine::filter_tasks(&once, &filter);
            let once_ids: Vec<i64> = once.iter().map(|t| t.id).collect();
            let twice_ids: Vec<i64> = twice.iter().map(|t| t.id).collect();
            assert_eq!(once_ids, twice_ids);
        }

        it "matches search case-insensitively against title or description" {
            let tasks = sample();
            let filter = TaskFilter {
                search: Some("EMAIL".into()),
                ..TaskFilter::default()
            };
            let ids: Vec<i64> = engine::filter_tasks(&tasks, &filter)
                .iter()
                .map(|t| t.id)
                .collect();
            assert_eq!(ids, vec![1, 2]);
        }

        it "combines predicates with AND" {
            let tasks = sample();
            let filter = TaskFilter {
                search: Some("email".into()),
                status: Some(TaskStatus::ToDo),
                priority: Some(TaskPriority::High),
                project_id: Some(10),
                assignee: Some(1),
            };
            let ids: Vec<i64> = engine::filter_tasks(&tasks, &filter)
                .iter()
                .map(|t| t.id)
                .collect();
            assert_eq!(ids, vec![1]);
        }

        it "never matches a concrete value against a null field" {
            let tasks = sample();
            let filter = TaskFilter {
                project_id: Some(999),
                ..TaskFilter::default()
            };
            assert!(engine::filter_tasks(&tasks, &filter).is_empty());

            // Task 3 has no assignee: it must not match any concrete id.
            let filter = TaskFilter {
                assignee: Some(1),
                ..TaskFilter::default()
            };
            let ids: Vec<i64> = engine::filter_tasks(&tasks, &filter)
                .iter()
                .map(|t| t.id)
                .collect();
            assert_eq!(ids, vec![1]);
        }

        it "does not mutate its input" {
            let tasks = sample();
            let filter = TaskFilter {
                status: Some(TaskStatus::Completed),
                ..TaskFilter::default()
            };
            let _ = engine::filter_tasks(&tasks, &filter);
            assert_eq!(tasks.len(), 3);
            assert_eq!(tasks[0].id, 1);
        }
    }

    describe "aggregation" {
        it "reports zero counts for unrepresented statuses" {
            let tasks = vec![task(1, TaskStatus::ToDo), task(2, TaskStatus::ToDo)];
            let counts = engine::status_counts(&tasks);
            assert_eq!(counts.to_do, 2);
            assert_eq!(counts.in_progress, 0);
            assert_eq!(counts.completed, 0);
            assert_eq!(counts.blocked, 0);
            for status in TaskStatus::ALL {
                let _ = counts.get(status);
            }
        }

        it "counts priorities across the whole scope" {
            let mut urgent = task(1, TaskStatus::ToDo);
            urgent.priority = TaskPriority::Urgent;
            let tasks = vec![urgent, task(2, TaskStatus::ToDo)];
            let counts = engine::priority_counts(&tasks);
            assert_eq!(counts.urgent, 1);
            assert_eq!(counts.medium, 1);
            assert_eq!(counts.low, 0);
            assert_eq!(counts.high, 0);
        }

        it "defines completion rate as zero for an empty scope" {
            assert_eq!(engine::completion_rate(&[]), 0.0);
        }

        it "reports 100 percent when everything is completed" {
            let tasks = vec![task(1, TaskStatus::Completed), task(2, TaskStatus::Completed)];
            assert_eq!(engine::completion_rate(&tasks), 100.0);
        }

        it "excludes completed tasks from the overdue count" {
            let mut done = task(1, TaskStatus::Completed);
            done.due_date = Some(day(2024, 1, 1));
            let mut open = task(2, TaskStatus::ToDo);
            open.due_date = Some(day(2024, 1, 2));
            let tasks = vec![done, open];
            assert_eq!(engine::overdue_count(&tasks, day(2024, 1, 5)), 1);
        }

        it "does not count tasks due today as overdue" {
            let mut open = task(1, TaskStatus::ToDo);
            open.due_date = Some(day(2024, 1, 5));
            assert_eq!(engine::overdue_count(&[open], day(2024, 1, 5)), 0);
        }

        it "sums tracked time and averages over completed tasks only" {
            let mut a = task(1, TaskStatus::Completed);
            a.actual_time = 4.0;
            let mut b = task(2, TaskStatus::Completed);
            b.actual_time = 2.0;
            let mut c = task(3, TaskStatus::InProgress);
            c.actual_time = 10.0;
            let tasks = vec![a, b, c];
            assert_eq!(engine::total_tracked_time(&tasks), 16.0);
            assert_eq!(engine::average_time_per_completed(&tasks), 3.0);
            assert_eq!(engine::tracked_task_count(&tasks), 3);
        }

        it "averages to zero when nothing is completed" {
            let mut open = task(1, TaskStatus::ToDo);
            open.actual_time = 5.0;
            assert_eq!(engine::average_time_per_completed(&[open]), 0.0);
        }

        it "derives project progress from task membership" {
            let p = project(10, "Relaunch");
            let mut tasks: Vec<Task> = (1..=4)
                .map(|id| {
                    let mut t = task(id, TaskStatus::ToDo);
                    t.project_id = Some(10);
                    t
                })
                .collect();
            tasks[0].status = TaskStatus::Completed;
            // A stray task outside the project must not count.
            tasks.push(task(5, TaskStatus::Completed));

            let progress = engine::project_progress(&p, &tasks);
            assert_eq!(progress.task_count, 4);
            assert_eq!(progress.completed_count, 1);
            assert_eq!(progress.progress, 25.0);
        }

        it "reports zero progress for an empty project" {
            let p = project(10, "Empty");
            let progress = engine::project_progress(&p, &[]);
            assert_eq!(progress.task_count, 0);
            assert_eq!(progress.progress, 0.0);
        }

        it "ranks projects by progress with a stable tie order" {
            let projects = vec![project(1, "A"), project(2, "B"), project(3, "C")];
            let mut done = task(1, TaskStatus::Completed);
            done.project_id = Some(3);
            // Projects 1 and 2 both sit at zero progress; input order wins.
            let ranked = engine::rank_projects(&projects, &[done]);
            let ids: Vec<i64> = ranked.iter().map(|p| p.project_id).collect();
            assert_eq!(ids, vec![3, 1, 2]);
        }

        it "lists tasks due on a specific day in input order" {
            let mut a = task(1, TaskStatus::ToDo);
            a.due_date = Some(day(2024, 3, 10));
            let mut b = task(2, TaskStatus::ToDo);
            b.due_date = Some(day(2024, 3, 11));
            let mut c = task(3, TaskStatus::ToDo);
            c.due_date = Some(day(2024, 3, 10));
            let due = engine::due_on(&[a, b, c], day(2024, 3, 10));
            let ids: Vec<i64> = due.iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![1, 3]);
        }

        it "caps recent activity at the requested limit, newest first" {
            let mut old = task(1, TaskStatus::ToDo);
            old.created_at = day(2024, 1, 1);
            let mut mid = task(2, TaskStatus::ToDo);
            mid.created_at = day(2024, 2, 1);
            let mut new = task(3, TaskStatus::ToDo);
            new.created_at = day(2024, 3, 1);
            let recent = engine::recent_activity(&[old, mid, new], 2);
            let ids: Vec<i64> = recent.iter().map(|t| t.id).collect();
            assert_eq!(ids, vec![3, 2]);
        }
    }

    describe "productivity series" {
        it "yields an entry for every day even with no activity" {
            let series: Vec<_> =
                engine::productivity_series(&[], 3, day(2024, 5, 10)).collect();
            assert_eq!(series.len(), 3);
            for entry in &series {
                assert_eq!(entry.completed_count, 0);
                assert_eq!(entry.created_count, 0);
            }
        }

        it "walks oldest to newest ending at the reference day" {
            let series: Vec<_> =
                engine::productivity_series(&[], 3, day(2024, 5, 10)).collect();
            let dates: Vec<_> = series.iter().map(|e| e.date).collect();
            assert_eq!(dates, vec![day(2024, 5, 8), day(2024, 5, 9), day(2024, 5, 10)]);
        }

        it "counts only exact-day matches" {
            let mut created = task(1, TaskStatus::ToDo);
            created.created_at = day(2024, 5, 9);
            let mut completed = task(2, TaskStatus::Completed);
            completed.created_at = day(2024, 5, 1);
            completed.completed_at = Some(day(2024, 5, 10));
            let tasks = vec![created, completed];

            let series: Vec<_> =
                engine::productivity_series(&tasks, 3, day(2024, 5, 10)).collect();
            assert_eq!(series[0].created_count, 0);
            assert_eq!(series[1].created_count, 1);
            assert_eq!(series[1].completed_count, 0);
            assert_eq!(series[2].completed_count, 1);
        }

        it "is restartable" {
            let tasks = vec![task(1, TaskStatus::ToDo)];
            let series = engine::productivity_series(&tasks, 5, day(2024, 5, 10));
            let first: Vec<_> = series.clone().collect();
            let second: Vec<_> = series.collect();
            assert_eq!(first, second);
        }

        it "knows its exact length" {
            let series = engine::productivity_series(&[], 7, day(2024, 5, 10));
            assert_eq!(series.len(), 7);
        }
    }
}
