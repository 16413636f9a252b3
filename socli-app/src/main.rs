use anyhow::Result;
use clap::Parser;
use crossterm::style::Stylize;
use socli_browse::{BrowserSession, ExitReason, SystemBrowser};
use socli_common::observability::init_logging;
use socli_common::{ErrorKind, SocliError};
use socli_config::INTERACTIVE_RESULT_LIMIT;
use std::process::ExitCode;

mod cli;
mod manual;
mod wiring;

use cli::Cli;
use wiring::{Services, line_mode, load_config, log_config};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report(&err),
    }
}

async fn run(cli: Cli) -> Result<()> {
    // 1) Settings: file, env, then flags
    let config = load_config(&cli)?;

    // 2) Logging before any network traffic
    let log_dir = init_logging(log_config(&config))?;
    tracing::debug!(log_dir = %log_dir.display(), "socli.start");

    let Services { resolver, loader } = Services::build(&config)?;
    let query = cli.query_text();
    let provider = config.search.provider;

    if let Some(index) = cli.index {
        let mut stdout = std::io::stdout();
        manual::print_nth(
            &resolver,
            &loader,
            provider,
            &query,
            index,
            config.search.manual_result_cap,
            &mut stdout,
        )
        .await?;
        return Ok(());
    }

    let cap = config.search.result_cap.min(INTERACTIVE_RESULT_LIMIT);
    let list = resolver
        .resolve(provider, &query, cap)
        .await
        .map_err(SocliError::from)?;
    let browser = SystemBrowser::new(config.browser.name.clone());
    let mut session = BrowserSession::new(list, loader, browser);

    let reason = if line_mode(config.ui.mode) {
        socli_tui::run_line(&mut session).await?
    } else {
        socli_tui::run_interactive(&mut session).await?
    };
    tracing::info!(
        reason = match reason {
            ExitReason::UserQuit => "quit",
            ExitReason::NoMoreAnswers => "no_more_answers",
        },
        "socli.session.end"
    );
    Ok(())
}

/// Print `err` once and pick the exit status.
fn report(err: &anyhow::Error) -> ExitCode {
    let Some(known) = err.downcast_ref::<SocliError>() else {
        eprintln!("{}", format!("{err:#}").red());
        return ExitCode::FAILURE;
    };
    tracing::warn!(error = %known, kind = ?known.kind(), "socli.exit");
    match known.kind() {
        ErrorKind::Fatal => println!("{}", known.to_string().red()),
        ErrorKind::Environment => eprintln!("{}", known.to_string().red()),
    }
    ExitCode::from(u8::try_from(known.exit_code()).unwrap_or(1))
}
