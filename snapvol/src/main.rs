use anyhow::Context;
use clap::{CommandFactory, Parser};
use snapvol::cli::Cli;
use snapvol::config::{self, SnapvolConfig};
use snapvol::{actions, logging, SnapvolError};
use snapvol_hal::MacHal;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(SnapvolError::Usage(msg)) = err.downcast_ref::<SnapvolError>() {
                Cli::command()
                    .error(clap::error::ErrorKind::MissingRequiredArgument, msg)
                    .exit();
            }
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config_path = config::resolve_path(cli.config.as_deref());
    let config =
        SnapvolConfig::load(config_path.as_deref()).context("failed to load configuration")?;
    let hal = MacHal::with_tools(config.tool_paths());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    actions::dispatch(&hal, &config, &cli.request(), &mut out)?;
    Ok(())
}
