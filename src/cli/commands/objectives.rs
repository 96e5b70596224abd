//! Objective commands.

use serde_json::json;

use super::Context;
use crate::cli::args::{ObjectiveCommands, OutputFormat};
use crate::error::FocusdeskError;
use crate::features::objectives::{validate_text, ObjectiveBoard};
use crate::output::{format_done, format_objectives, to_json};

/// Execute objective subcommands.
///
/// Text is validated before connecting, so a blank objective never reaches
/// the backend.
///
/// # Errors
///
/// Returns `UserInput` for blank text, otherwise the backend failure.
pub async fn objective(ctx: &Context, cmd: ObjectiveCommands) -> Result<String, FocusdeskError> {
    match cmd {
        ObjectiveCommands::List { task } => {
            let mut board = ObjectiveBoard::new(ctx.connect().await?);
            let objectives = board.load(task).await?;
            format_objectives(task, objectives, ctx.format)
        }

        ObjectiveCommands::Add { task, text } => {
            let text = validate_text(&text)?;
            let mut board = ObjectiveBoard::new(ctx.connect().await?);
            let created = board.add(task, &text).await?;
            match ctx.format {
                OutputFormat::Json => to_json(&created),
                OutputFormat::Pretty => Ok(format_done(&format!(
                    "Added objective {} to task {task}",
                    created.objective_id
                ))),
            }
        }

        ObjectiveCommands::Done { id, undo } => {
            let mut board = ObjectiveBoard::new(ctx.connect().await?);
            board.set_completed(id, !undo).await?;
            let state = if undo { "not done" } else { "done" };
            acknowledge(ctx.format, id, &format!("Objective {id} marked {state}"))
        }

        ObjectiveCommands::Edit { id, text } => {
            let text = validate_text(&text)?;
            let mut board = ObjectiveBoard::new(ctx.connect().await?);
            board.edit(id, &text).await?;
            acknowledge(ctx.format, id, &format!("Objective {id} updated"))
        }

        ObjectiveCommands::Delete { id } => {
            let mut board = ObjectiveBoard::new(ctx.connect().await?);
            board.remove(id).await?;
            acknowledge(ctx.format, id, &format!("Objective {id} deleted"))
        }
    }
}

fn acknowledge(format: OutputFormat, id: i64, message: &str) -> Result<String, FocusdeskError> {
    match format {
        OutputFormat::Json => to_json(&json!({ "objective_id": id, "message": message })),
        OutputFormat::Pretty => Ok(format_done(message)),
    }
}
