//! Pure, synchronous derivations over already-loaded collections.
//!
//! Nothing in this module suspends, fails on well-typed input, or mutates
//! its arguments; every function returns newly derived values so callers
//! keep exclusive ownership of their collections.

pub mod aggregate;
pub mod calendar;
pub mod filter;

pub use aggregate::{
    average_time_per_completed, completion_rate, due_on, overdue_count, priority_counts,
    productivity_series, project_progress, rank_projects, recent_activity, status_counts,
    total_tracked_time, tracked_task_count, DailyProductivity, PriorityCounts,
    ProductivitySeries, ProjectProgress, StatusCounts,
};
pub use calendar::{end_of_week, month_grid, start_of_week, week_slice, CalendarCell};
pub use filter::{filter_tasks, TaskFilter};
