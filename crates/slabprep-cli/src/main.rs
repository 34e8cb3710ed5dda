mod cli;
mod cluster;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("slabprep CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = match cli.command {
        Commands::Generate(args) => {
            info!("Dispatching to 'generate' command.");
            commands::generate::run(args)
        }
        Commands::Restart(args) => {
            info!("Dispatching to 'restart' command.");
            commands::restart::run(args)
        }
        Commands::Status(args) => {
            info!("Dispatching to 'status' command.");
            commands::status::run(args)
        }
        Commands::ExportXyz(args) => {
            info!("Dispatching to 'export-xyz' command.");
            commands::export::run(args)
        }
        Commands::Remote(args) => {
            info!("Dispatching to 'remote' command.");
            commands::remote::run(args)
        }
    };

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RemoteCommands;

    #[test]
    fn parses_generate_with_overrides() {
        let cli = Cli::try_parse_from([
            "slabprep",
            "-vv",
            "generate",
            "-c",
            "params.toml",
            "-S",
            "fluid_gap=12",
            "-S",
            "rho_fluid=0.7",
            "--name-prefix",
            "WCA",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.set_values, vec!["fluid_gap=12", "rho_fluid=0.7"]);
                assert_eq!(args.output_dir.to_str(), Some("."));
                assert_eq!(args.name_prefix.as_deref(), Some("WCA"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["slabprep", "-q", "-v", "status", "-i", "box.in", "x"]).is_err());
    }

    #[test]
    fn export_defaults_to_display_radii() {
        let cli = Cli::try_parse_from(["slabprep", "export-xyz", "-i", "data.slit"]).unwrap();
        match cli.command {
            Commands::ExportXyz(args) => {
                assert_eq!(args.fluid_radius, 1.88);
                assert_eq!(args.wall_radius, 3.4);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn remote_connection_accepts_flags() {
        let cli = Cli::try_parse_from([
            "slabprep",
            "remote",
            "--host",
            "cluster",
            "--user",
            "alice",
            "--key",
            "id_ed25519",
            "--sim-dir",
            "/scratch/sims",
            "resume",
            "halfway",
            "-n",
            "1000",
        ])
        .unwrap();
        match cli.command {
            Commands::Remote(args) => {
                assert_eq!(args.connection.user, "alice");
                assert!(matches!(
                    args.command,
                    RemoteCommands::Resume {
                        run_length: Some(1000),
                        ..
                    }
                ));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_submit_flag_selects_the_continuation_job_script() {
        let cli = Cli::try_parse_from([
            "slabprep",
            "remote",
            "--host",
            "cluster",
            "--user",
            "alice",
            "--key",
            "id",
            "--sim-dir",
            "/scratch",
            "resume",
            "halfway",
            "--submit",
        ])
        .unwrap();
        match cli.command {
            Commands::Remote(args) => assert!(matches!(
                args.command,
                RemoteCommands::Resume { submit: Some(ref s), .. } if s == "run_restart.sh"
            )),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
