//! Request and response types for the task manager backend.
//!
//! The backend serializes MySQL rows directly, so numeric aggregates may
//! arrive as JSON numbers, decimal strings or `null`, and booleans as `0`/`1`.
//! The `lenient` helpers below absorb those shapes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Backend identifier of a task.
pub type TaskId = i64;
/// Backend identifier of a focus session.
pub type SessionId = i64;
/// Backend identifier of a focus objective.
pub type ObjectiveId = i64;

// ---------- Auth ----------

/// Body of `POST /api/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ---------- Tasks ----------

/// A task as listed by `GET /tasks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: TaskId,
    #[serde(default)]
    pub task_title: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Status value the backend uses for finished tasks.
pub const TASK_STATUS_COMPLETED: &str = "completada";

impl Task {
    /// Title to show, falling back when the backend sent none.
    #[must_use]
    pub fn title(&self) -> &str {
        self.task_title.as_deref().unwrap_or("Untitled task")
    }

    /// Whether this task can still be focused on.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status.as_deref() != Some(TASK_STATUS_COMPLETED)
    }

    /// Title plus project, as shown in the picker.
    #[must_use]
    pub fn label(&self) -> String {
        match &self.project_name {
            Some(project) => format!("{} ({project})", self.title()),
            None => self.title().to_string(),
        }
    }
}

// ---------- Focus sessions ----------

/// Body of `POST /api/focus/start_session`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct StartSessionRequest {
    pub task_id: TaskId,
}

/// Response of a successful start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartedSession {
    pub session_id: SessionId,
    pub start_time: NaiveDateTime,
}

/// Response of `POST /api/focus/end_session`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndedSession {
    #[serde(default)]
    pub session_id: Option<SessionId>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub duration_seconds: Option<i64>,
    #[serde(deserialize_with = "lenient::f64")]
    pub duration_minutes: f64,
}

/// A session the backend still considers open (`GET /api/focus/active_session`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub session_id: SessionId,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    pub start_time: NaiveDateTime,
}

/// A finished session from `GET /api/focus/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: SessionId,
    #[serde(default)]
    pub task_id: Option<TaskId>,
    #[serde(default)]
    pub task_title: Option<String>,
    /// Kept as sent; the backend uses HTTP-date formatting here.
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub duration_seconds: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub duration_minutes: Option<f64>,
}

// ---------- Stats ----------

/// Aggregates from `GET /api/focus/stats?days=N`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusStats {
    #[serde(default, deserialize_with = "lenient::i64")]
    pub period_days: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_focus_minutes: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_sessions: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub avg_session_duration: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub total_objectives: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub completed_objectives: i64,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub objective_completion_rate: i64,
    #[serde(default)]
    pub top_focused_tasks: Vec<TopTask>,
    #[serde(default)]
    pub daily_distribution: Vec<WeekdayShare>,
}

/// One of the most-focused tasks in a stats period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopTask {
    pub task_title: String,
    #[serde(default, deserialize_with = "lenient::i64")]
    pub session_count: i64,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_minutes: f64,
}

/// Focus minutes for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayShare {
    pub day_name: String,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub total_minutes: f64,
}

// ---------- Objectives ----------

/// A checklist item attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusObjective {
    pub objective_id: ObjectiveId,
    pub task_id: TaskId,
    pub objective_text: String,
    #[serde(default, deserialize_with = "lenient::bool")]
    pub completed: bool,
}

/// Body of `POST /focus_objectives`.
#[derive(Debug, Clone, Serialize)]
pub struct NewObjective {
    pub task_id: TaskId,
    pub objective_text: String,
}

/// Body of `PUT /focus_objectives/:id`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectiveUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_text: Option<String>,
}

// ---------- Errors ----------

/// Error payload returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number(value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn opt_f64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        let value = Value::deserialize(de)?;
        Ok(number(&value))
    }

    pub fn f64<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        Ok(opt_f64(de)?.unwrap_or(0.0))
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn opt_i64<'de, D: Deserializer<'de>>(de: D) -> Result<Option<i64>, D::Error> {
        Ok(opt_f64(de)?.map(|n| n.round() as i64))
    }

    pub fn i64<'de, D: Deserializer<'de>>(de: D) -> Result<i64, D::Error> {
        Ok(opt_i64(de)?.unwrap_or(0))
    }

    pub fn bool<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
        let value = Value::deserialize(de)?;
        Ok(match value {
            Value::Bool(b) => b,
            other => number(&other).is_some_and(|n| n != 0.0),
        })
    }
}
