use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked interval against a task. `duration` is supplied by the
/// caller in hours and is not validated against the timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub task_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTimeEntryInput {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    pub duration: f64,
}

impl CreateTimeEntryInput {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.duration < 0.0 || !self.duration.is_finite() {
            return Err("duration must be a non-negative number".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTimeEntryInput {
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration: Option<f64>,
}

impl UpdateTimeEntryInput {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.duration.is_some_and(|d| d < 0.0 || !d.is_finite()) {
            return Err("duration must be a non-negative number".into());
        }
        Ok(())
    }
}
