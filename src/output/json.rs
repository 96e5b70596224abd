//! JSON output formatting for focusdesk.

use serde::Serialize;
use serde_json::json;

use crate::api::{ActiveSession, FocusObjective, SessionRecord, Task, TaskId};
use crate::error::FocusdeskError;

/// Format tasks as JSON
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_tasks_json(tasks: &[Task]) -> Result<String, FocusdeskError> {
    let output = json!({
        "count": tasks.len(),
        "items": tasks
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format session history as JSON
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_history_json(records: &[SessionRecord], days: u32) -> Result<String, FocusdeskError> {
    let output = json!({
        "days": days,
        "count": records.len(),
        "items": records
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the open-session check as JSON (`null` when none is open)
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_active_json(active: Option<&ActiveSession>) -> Result<String, FocusdeskError> {
    let output = json!({ "active_session": active });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a task's objectives as JSON
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn format_objectives_json(
    task_id: TaskId,
    objectives: &[FocusObjective],
) -> Result<String, FocusdeskError> {
    let completed = objectives.iter().filter(|o| o.completed).count();
    let output = json!({
        "task_id": task_id,
        "count": objectives.len(),
        "completed": completed,
        "items": objectives
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `FocusdeskError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, FocusdeskError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: i64, title: &str) -> Task {
        Task {
            task_id: id,
            task_title: Some(title.to_string()),
            project_name: Some("Launch".to_string()),
            status: Some("pendiente".to_string()),
            due_date: None,
        }
    }

    #[test]
    fn test_format_tasks_json() {
        let result = format_tasks_json(&[task(1, "Write copy"), task(2, "Ship")]).unwrap();

        assert!(result.contains("\"count\": 2"));
        assert!(result.contains("\"task_title\": \"Write copy\""));
    }

    #[test]
    fn test_format_active_json_none_is_null() {
        let result = format_active_json(None).unwrap();
        assert!(result.contains("\"active_session\": null"));
    }

    #[test]
    fn test_format_active_json_some() {
        let active = ActiveSession {
            session_id: 5,
            task_id: Some(42),
            start_time: NaiveDate::from_ymd_opt(2024, 3, 4)
                .unwrap()
                .and_hms_opt(9, 15, 0)
                .unwrap(),
        };
        let result = format_active_json(Some(&active)).unwrap();

        assert!(result.contains("\"session_id\": 5"));
        assert!(result.contains("2024-03-04T09:15:00"));
    }

    #[test]
    fn test_format_objectives_json_counts_completed() {
        let objectives = vec![
            FocusObjective {
                objective_id: 1,
                task_id: 42,
                objective_text: "Outline".to_string(),
                completed: true,
            },
            FocusObjective {
                objective_id: 2,
                task_id: 42,
                objective_text: "Draft".to_string(),
                completed: false,
            },
        ];
        let result = format_objectives_json(42, &objectives).unwrap();

        assert!(result.contains("\"count\": 2"));
        assert!(result.contains("\"completed\": 1"));
    }

    #[test]
    fn test_json_preserves_special_characters() {
        let result = to_json(&task(1, "Task with \"quotes\"\tand tabs")).unwrap();

        assert!(result.contains("\\\"quotes\\\""));
        assert!(result.contains("\\t"));
    }
}
