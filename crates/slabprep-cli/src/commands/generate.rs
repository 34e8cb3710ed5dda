use crate::cli::GenerateArgs;
use crate::config::FileConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use slabprep::core::cluster::queues;
use slabprep::core::io::sink::DirectorySink;
use slabprep::engine::progress::ProgressReporter;
use slabprep::workflows;
use tracing::{debug, info};

pub fn run(args: GenerateArgs) -> Result<()> {
    let mut file_config = FileConfig::from_file(&args.config)?;
    file_config.apply_set_values(&args.set_values)?;
    if let Some(prefix) = &args.name_prefix {
        file_config.apply_name_prefix(prefix)?;
    }
    debug!(
        "{} parameter(s) after overrides",
        file_config.parameters().len()
    );

    info!("Validating configuration and reading templates...");
    let config = file_config.into_generation_config()?;

    if let Some(stage) = &config.submit {
        if let Some(days) = queues::max_walltime_days(&stage.fields.queue) {
            info!(
                "Queue '{}' allows jobs of up to {} days.",
                stage.fields.queue, days
            );
        }
    }

    let run_dir = args.output_dir.join(&config.outputs.simulation_name);
    let mut sink = DirectorySink::new(&run_dir);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Generating run '{}'...", config.outputs.simulation_name);
    let summary = workflows::generate::run(&config, &mut sink, &reporter)?;

    println!(
        "✓ {} fluid and {} wall atoms ({} total)",
        summary.counts.fluid,
        summary.counts.wall(),
        summary.counts.total()
    );
    println!(
        "  Fluid density {:.4} (target {:.4}), wall density {:.4} (target {:.4})",
        summary.density.fluid.achieved,
        summary.density.fluid.requested,
        summary.density.wall.achieved,
        summary.density.wall.requested
    );
    println!("  Wrote {} to {}", summary.artifacts.join(", "), run_dir.display());
    Ok(())
}
