//! Access to the task manager backend.
//!
//! The controller and the objective board only see the traits defined here;
//! [`BackendClient`] is the reqwest implementation used by the binary.

mod client;
pub mod types;

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

pub use client::{BackendClient, Credentials};
pub use types::{
    ActiveSession, EndedSession, FocusObjective, FocusStats, NewObjective, ObjectiveId,
    ObjectiveUpdate, SessionId, SessionRecord, StartedSession, Task, TaskId,
};

use crate::error::FocusdeskError;

/// Focus session operations the timer depends on.
///
/// The backend enforces at most one open session per user: `start_session`
/// is rejected while one is open, and `end_session`/`discard_session` act on
/// whichever session is open for the caller.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait FocusApi: Send + Sync {
    /// Open a session for a task.
    async fn start_session(&self, task_id: TaskId) -> Result<StartedSession, FocusdeskError>;

    /// Finalize the open session as a completed focus interval.
    async fn end_session(&self) -> Result<EndedSession, FocusdeskError>;

    /// Close the open session without treating it as a completed interval.
    async fn discard_session(&self) -> Result<(), FocusdeskError>;

    /// The session left open by an earlier client, if any.
    async fn active_session(&self) -> Result<Option<ActiveSession>, FocusdeskError>;
}

/// Focus objective CRUD.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ObjectiveApi: Send + Sync {
    /// Objectives of a task, oldest first.
    async fn list_objectives(&self, task_id: TaskId)
        -> Result<Vec<FocusObjective>, FocusdeskError>;

    /// Create an objective.
    async fn create_objective(&self, objective: NewObjective)
        -> Result<FocusObjective, FocusdeskError>;

    /// Change text and/or completion of an objective.
    async fn update_objective(
        &self,
        objective_id: ObjectiveId,
        update: ObjectiveUpdate,
    ) -> Result<(), FocusdeskError>;

    /// Remove an objective.
    async fn delete_objective(&self, objective_id: ObjectiveId) -> Result<(), FocusdeskError>;
}
