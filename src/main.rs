use std::io;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use colored::Colorize;

use focusdesk::cli::args::{Cli, Commands, FocusCommands};
use focusdesk::cli::commands::{self, Context};
use focusdesk::error::FocusdeskError;
use focusdesk::logging::{self, LogTarget};

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Completions need neither config nor a runtime
    if let Commands::Completions { shell } = cli.command {
        let mut command = Cli::command();
        let name = command.get_name().to_string();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let ctx = Context::resolve(&cli)?;
    init_logging(&cli, &ctx)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let output = match runtime.block_on(dispatch(&ctx, cli.command)) {
        Ok(output) => output,
        Err(e) if e.is_unauthorized() => {
            return Err(anyhow::Error::new(e)
                .context("Not logged in; set FOCUSDESK_EMAIL and FOCUSDESK_PASSWORD"));
        }
        Err(e) => return Err(e.into()),
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}

async fn dispatch(ctx: &Context, command: Commands) -> Result<String, FocusdeskError> {
    match command {
        Commands::Tasks { all } => commands::tasks(ctx, all).await,
        Commands::Focus(args) => commands::focus(ctx, args.command).await,
        Commands::Objective(args) => commands::objective(ctx, args.command).await,
        Commands::Config(args) => commands::config(ctx, args.command),
        Commands::Completions { .. } => Ok(String::new()),
    }
}

/// The full-screen timer owns the terminal, so it logs to a file.
fn init_logging(cli: &Cli, ctx: &Context) -> Result<()> {
    let tui = matches!(
        &cli.command,
        Commands::Focus(args) if matches!(args.command, FocusCommands::Run { headless: false, .. })
    );
    let target = if tui {
        ctx.paths.ensure_dirs()?;
        LogTarget::File(ctx.paths.log_file.clone())
    } else {
        LogTarget::Stderr
    };
    logging::init(cli.verbose, &ctx.config.log.level, target).context("Failed to set up logging")
}
