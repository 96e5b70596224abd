//! Task listing.

use super::Context;
use crate::error::FocusdeskError;
use crate::output::format_tasks;

/// List tasks; finished ones only with `all`.
///
/// # Errors
///
/// Returns an error if the backend call or output formatting fails.
pub async fn tasks(ctx: &Context, all: bool) -> Result<String, FocusdeskError> {
    let client = ctx.connect().await?;
    let (tasks, title) = if all {
        (client.tasks().await?, "Tasks")
    } else {
        (client.pending_tasks().await?, "Pending tasks")
    };
    format_tasks(&tasks, title, ctx.format)
}
