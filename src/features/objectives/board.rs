//! Per-task objective checklist with a client-side cache.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::api::{FocusObjective, NewObjective, ObjectiveApi, ObjectiveId, ObjectiveUpdate, TaskId};
use crate::error::FocusdeskError;

/// Objectives of the tasks the user has looked at.
pub struct ObjectiveBoard<A: ObjectiveApi + ?Sized> {
    api: Arc<A>,
    cache: HashMap<TaskId, Vec<FocusObjective>>,
}

impl<A: ObjectiveApi + ?Sized> ObjectiveBoard<A> {
    /// Create an empty board.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            cache: HashMap::new(),
        }
    }

    /// Fetch the objectives of a task and replace the cached copy.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the cache is left as it was.
    pub async fn load(&mut self, task_id: TaskId) -> Result<&[FocusObjective], FocusdeskError> {
        let objectives = self.api.list_objectives(task_id).await?;
        debug!(task_id, count = objectives.len(), "Loaded objectives");
        let slot = self.cache.entry(task_id).or_default();
        *slot = objectives;
        Ok(slot.as_slice())
    }

    /// Cached objectives of a task, if loaded.
    pub fn cached(&self, task_id: TaskId) -> Option<&[FocusObjective]> {
        self.cache.get(&task_id).map(Vec::as_slice)
    }

    /// `(completed, total)` for a loaded task.
    pub fn progress(&self, task_id: TaskId) -> (usize, usize) {
        self.cached(task_id).map_or((0, 0), |objectives| {
            let done = objectives.iter().filter(|o| o.completed).count();
            (done, objectives.len())
        })
    }

    /// Add an objective to a task.
    ///
    /// # Errors
    ///
    /// `UserInput` for blank text (no request is made), otherwise the
    /// request failure.
    pub async fn add(
        &mut self,
        task_id: TaskId,
        text: &str,
    ) -> Result<FocusObjective, FocusdeskError> {
        let objective_text = validate_text(text)?;
        let created = self
            .api
            .create_objective(NewObjective {
                task_id,
                objective_text,
            })
            .await?;
        self.cache.entry(task_id).or_default().push(created.clone());
        Ok(created)
    }

    /// Mark an objective done or not done.
    ///
    /// # Errors
    ///
    /// Returns the request failure; the cache is only updated on success.
    pub async fn set_completed(
        &mut self,
        objective_id: ObjectiveId,
        completed: bool,
    ) -> Result<(), FocusdeskError> {
        self.api
            .update_objective(
                objective_id,
                ObjectiveUpdate {
                    completed: Some(completed),
                    ..ObjectiveUpdate::default()
                },
            )
            .await?;
        if let Some(objective) = self.find_mut(objective_id) {
            objective.completed = completed;
        }
        Ok(())
    }

    /// Flip the completion of a cached objective.
    ///
    /// # Errors
    ///
    /// `NotFound` if the objective is not cached, otherwise the request failure.
    pub async fn toggle(&mut self, objective_id: ObjectiveId) -> Result<bool, FocusdeskError> {
        let completed = !self
            .find(objective_id)
            .ok_or_else(|| FocusdeskError::NotFound(format!("objective {objective_id}")))?
            .completed;
        self.set_completed(objective_id, completed).await?;
        Ok(completed)
    }

    /// Change the text of an objective.
    ///
    /// # Errors
    ///
    /// `UserInput` for blank text (no request is made), otherwise the
    /// request failure.
    pub async fn edit(
        &mut self,
        objective_id: ObjectiveId,
        text: &str,
    ) -> Result<(), FocusdeskError> {
        let objective_text = validate_text(text)?;
        self.api
            .update_objective(
                objective_id,
                ObjectiveUpdate {
                    objective_text: Some(objective_text.clone()),
                    ..ObjectiveUpdate::default()
                },
            )
            .await?;
        if let Some(objective) = self.find_mut(objective_id) {
            objective.objective_text = objective_text;
        }
        Ok(())
    }

    /// Delete an objective.
    ///
    /// # Errors
    ///
    /// Returns the request failure.
    pub async fn remove(&mut self, objective_id: ObjectiveId) -> Result<(), FocusdeskError> {
        self.api.delete_objective(objective_id).await?;
        for objectives in self.cache.values_mut() {
            objectives.retain(|o| o.objective_id != objective_id);
        }
        Ok(())
    }

    fn find(&self, objective_id: ObjectiveId) -> Option<&FocusObjective> {
        self.cache
            .values()
            .flatten()
            .find(|o| o.objective_id == objective_id)
    }

    fn find_mut(&mut self, objective_id: ObjectiveId) -> Option<&mut FocusObjective> {
        self.cache
            .values_mut()
            .flatten()
            .find(|o| o.objective_id == objective_id)
    }
}

/// Trimmed objective text, rejecting blanks.
///
/// # Errors
///
/// Returns `UserInput` if nothing but whitespace is left.
pub fn validate_text(text: &str) -> Result<String, FocusdeskError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(FocusdeskError::UserInput(
            "Objective text cannot be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockObjectiveApi;
    use mockall::predicate::{always, eq};

    fn objective(id: i64, text: &str, completed: bool) -> FocusObjective {
        FocusObjective {
            objective_id: id,
            task_id: 42,
            objective_text: text.to_string(),
            completed,
        }
    }

    fn with_two_objectives(api: &mut MockObjectiveApi) {
        api.expect_list_objectives()
            .with(eq(42))
            .times(1)
            .returning(|_| {
                Ok(vec![
                    objective(1, "Outline", true),
                    objective(2, "Draft", false),
                ])
            });
    }

    #[tokio::test]
    async fn test_load_and_progress() {
        let mut api = MockObjectiveApi::new();
        with_two_objectives(&mut api);
        let mut board = ObjectiveBoard::new(Arc::new(api));

        assert_eq!(board.progress(42), (0, 0));
        assert_eq!(board.load(42).await.unwrap().len(), 2);
        assert_eq!(board.progress(42), (1, 2));
    }

    #[tokio::test]
    async fn test_blank_text_makes_no_request() {
        let mut api = MockObjectiveApi::new();
        api.expect_create_objective().never();
        api.expect_update_objective().never();
        let mut board = ObjectiveBoard::new(Arc::new(api));

        let err = board.add(42, "   ").await.unwrap_err();
        assert!(matches!(err, FocusdeskError::UserInput(_)));

        let err = board.edit(1, "\t").await.unwrap_err();
        assert!(matches!(err, FocusdeskError::UserInput(_)));
    }

    #[tokio::test]
    async fn test_add_trims_and_caches() {
        let mut api = MockObjectiveApi::new();
        api.expect_create_objective()
            .withf(|new| new.task_id == 42 && new.objective_text == "Review notes")
            .times(1)
            .returning(|new| Ok(objective(9, &new.objective_text, false)));
        let mut board = ObjectiveBoard::new(Arc::new(api));

        let created = board.add(42, "  Review notes ").await.unwrap();

        assert_eq!(created.objective_id, 9);
        assert_eq!(board.progress(42), (0, 1));
    }

    #[tokio::test]
    async fn test_toggle_updates_cache() {
        let mut api = MockObjectiveApi::new();
        with_two_objectives(&mut api);
        api.expect_update_objective()
            .with(
                eq(2),
                eq(ObjectiveUpdate {
                    completed: Some(true),
                    objective_text: None,
                }),
            )
            .times(1)
            .returning(|_, _| Ok(()));
        let mut board = ObjectiveBoard::new(Arc::new(api));
        board.load(42).await.unwrap();

        assert!(board.toggle(2).await.unwrap());
        assert_eq!(board.progress(42), (2, 2));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_cache() {
        let mut api = MockObjectiveApi::new();
        with_two_objectives(&mut api);
        api.expect_update_objective()
            .with(eq(1), always())
            .times(1)
            .returning(|_, _| Err(FocusdeskError::rejected(500, "boom")));
        let mut board = ObjectiveBoard::new(Arc::new(api));
        board.load(42).await.unwrap();

        assert!(board.set_completed(1, false).await.is_err());
        assert_eq!(board.progress(42), (1, 2));
    }

    #[tokio::test]
    async fn test_toggle_unknown_objective() {
        let mut board = ObjectiveBoard::new(Arc::new(MockObjectiveApi::new()));

        let err = board.toggle(77).await.unwrap_err();
        assert!(matches!(err, FocusdeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_edit_and_remove() {
        let mut api = MockObjectiveApi::new();
        with_two_objectives(&mut api);
        api.expect_update_objective()
            .times(1)
            .returning(|_, _| Ok(()));
        api.expect_delete_objective()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(()));
        let mut board = ObjectiveBoard::new(Arc::new(api));
        board.load(42).await.unwrap();

        board.edit(2, "Final draft").await.unwrap();
        board.remove(1).await.unwrap();

        let cached = board.cached(42).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].objective_text, "Final draft");
    }
}
