// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, hand them to `app::run`.
// - Every error ends the run here; usage errors also print the usage line.

use std::process::ExitCode;

use anyhow::Context as _;
use clap::CommandFactory as _;
use outcomes_import::cli::Cli;
use outcomes_import::error::UsageError;
use outcomes_import::{app, logging};

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        if let Some(usage) = err.downcast_ref::<UsageError>() {
            eprintln!("{}", Cli::command().render_usage());
            eprintln!("{usage}");
            return ExitCode::from(2);
        }
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    logging::init().context("init logging")?;

    let cli = Cli::parse_env();
    tracing::debug!(
        domain = ?cli.domain,
        status = ?cli.status,
        available = cli.available,
        guid = ?cli.guid,
        config = ?cli.config,
        "parsed cli"
    );

    let stdout = std::io::stdout();
    app::run(&cli, &mut stdout.lock())
}
