//! Terminal front end: one-shot commands and an interactive shell over the
//! interaction controller.

pub mod cli;
pub mod core;
pub mod error_handler;
pub mod shell;
pub mod terminal_view;

use std::{process::ExitCode, rc::Rc};

use interaction::{CLEAR_PROMPT, Confirmation, InteractionController, Outcome};
use rag_gateway::BackendService;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    task::LocalSet,
};
use tracing::{debug, info};

use crate::{
    cli::{Cli, Command},
    core::app_settings::AppSettings,
    error_handler::AppError,
    terminal_view::TerminalView,
};

/// Runs the command selected on the command line.
pub async fn start(cli: Cli) -> Result<ExitCode, AppError> {
    let settings = AppSettings::from_env()?.with_overrides(&cli.global)?;
    let backend = BackendService::new(settings.gateway.clone())?;
    let view = TerminalView::stdout(settings.html);
    let ctrl = InteractionController::new(backend, view, settings.controller());

    let command = cli.command.unwrap_or(Command::Shell);
    debug!(?command, "dispatching");

    let outcome = match command {
        Command::Ask { question } => ctrl.ask(&question.join(" ")).await,
        Command::Ingest { text, file } => shell::ingest_if_enabled(&ctrl, text, file).await?,
        Command::Status => ctrl.refresh_status().await,
        Command::Clear { yes } => {
            let confirmation = if yes {
                Confirmation::Granted
            } else {
                ctrl.with_view(|v| v.line(&format!("{CLEAR_PROMPT} [yes/no]")));
                let mut stdin = BufReader::new(tokio::io::stdin()).lines();
                shell::confirmation_from(stdin.next_line().await?.as_deref())
            };
            let outcome = ctrl.clear(confirmation).await;
            if outcome == Outcome::Cancelled {
                ctrl.with_view(|v| v.line("Clear cancelled."));
            }
            outcome
        }
        Command::Shell => {
            info!(base_url = %settings.gateway.base_url, "starting shell");
            let input = BufReader::new(tokio::io::stdin());
            LocalSet::new()
                .run_until(shell::run(Rc::new(ctrl), input, settings.status_poll))
                .await?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    debug!(?outcome, "command finished");
    Ok(ExitCode::from(exit_status(outcome)))
}

/// Process exit status for a one-shot command.
///
/// `0` applied or cancelled, `1` request failed, `2` input rejected.
pub fn exit_status(outcome: Outcome) -> u8 {
    match outcome {
        Outcome::Applied | Outcome::Cancelled => 0,
        Outcome::Rejected => 2,
        Outcome::Failed(_) | Outcome::Suppressed | Outcome::Stale => 1,
    }
}
