use crate::cli::{RemoteArgs, RemoteCommands};
use crate::cluster::{ClusterClient, SshCluster};
use crate::error::{CliError, Result};
use slabprep::core::cluster::checkpoints::DEFAULT_CHECKPOINT_STEM;
use slabprep::engine::config::CONTINUATION_SCRIPT_NAME;
use slabprep::workflows::resume::{self, CompletionStatus, ResumePlan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub fn run(args: RemoteArgs) -> Result<()> {
    let client = SshCluster::new(args.connection.into());
    execute(&client, args.command)
}

fn execute(client: &impl ClusterClient, command: RemoteCommands) -> Result<()> {
    match command {
        RemoteCommands::Jobs => {
            print!("{}", client.job_status()?);
        }
        RemoteCommands::List => {
            for name in client.list_simulations()? {
                println!("{name}");
            }
        }
        RemoteCommands::Fetch {
            simulation,
            file,
            output_dir,
        } => {
            let path = match file {
                Some(name) => client.fetch_file(&simulation, &name, &output_dir)?,
                None => client.fetch_simulation(&simulation, &output_dir)?,
            };
            println!("✓ Fetched {}", path.display());
        }
        RemoteCommands::FetchAll { file, output_dir } => {
            let fetched = fetch_all(client, &file, &output_dir)?;
            println!("✓ Fetched '{}' from {} run(s)", file, fetched.len());
        }
        RemoteCommands::Unfinished { script } => {
            let rows = unfinished(client, &script)?;
            if rows.is_empty() {
                println!("All runs are finished.");
            } else {
                println!("{:<32} {:>12} {:>12}", "RUN", "LAST STEP", "RUN LENGTH");
                for (name, status) in &rows {
                    let last = status
                        .last
                        .as_ref()
                        .map_or_else(|| "-".to_string(), |c| c.step.to_string());
                    println!(
                        "{:<32} {:>12} {:>12}",
                        name, last, status.declared_run_length
                    );
                }
            }
        }
        RemoteCommands::Resume {
            simulation,
            run_length,
            script,
            submit,
            output_dir,
        } => {
            resume_simulation(
                client,
                &simulation,
                &script,
                run_length,
                submit.as_deref(),
                &output_dir,
            )?;
        }
    }
    Ok(())
}

/// Downloads `file` from every run into `<dest>/<run>/`. The first failure aborts.
fn fetch_all(client: &impl ClusterClient, file: &str, dest: &Path) -> Result<Vec<PathBuf>> {
    let simulations = client.list_simulations()?;
    let mut fetched = Vec::with_capacity(simulations.len());
    for simulation in &simulations {
        info!("Fetching '{}' from run '{}'", file, simulation);
        fetched.push(client.fetch_file(simulation, file, &dest.join(simulation))?);
    }
    Ok(fetched)
}

/// Completion status of every run that has not reached its declared run length.
///
/// Runs whose control script is missing or declares no run length are skipped.
fn unfinished(
    client: &impl ClusterClient,
    script: &str,
) -> Result<Vec<(String, CompletionStatus)>> {
    let mut rows = Vec::new();
    for simulation in client.list_simulations()? {
        let files = client.list_files(&simulation)?;
        if !files.iter().any(|f| f == script) {
            warn!("Run '{}' has no '{}'; skipping.", simulation, script);
            continue;
        }
        let text = client.read_file(&simulation, script)?;
        match resume::completion_status(
            &text,
            files.iter().map(String::as_str),
            DEFAULT_CHECKPOINT_STEM,
        ) {
            Ok(status) if status.finished() => {}
            Ok(status) => rows.push((simulation, status)),
            Err(e) => warn!("Skipping run '{}': {}", simulation, e),
        }
    }
    Ok(rows)
}

/// Rejects job scripts that do not hand the continuation script to LAMMPS.
fn ensure_runs_continuation(
    client: &impl ClusterClient,
    simulation: &str,
    job_script: &str,
) -> Result<()> {
    let text = client.read_file(simulation, job_script)?;
    if text
        .split_whitespace()
        .any(|token| token == CONTINUATION_SCRIPT_NAME)
    {
        Ok(())
    } else {
        Err(CliError::Argument(format!(
            "job script '{job_script}' does not run '{CONTINUATION_SCRIPT_NAME}' and would restart '{simulation}' from scratch"
        )))
    }
}

fn resume_simulation(
    client: &impl ClusterClient,
    simulation: &str,
    script: &str,
    run_length: Option<u64>,
    submit: Option<&str>,
    output_dir: &Path,
) -> Result<()> {
    let files = client.list_files(simulation)?;
    let text = client.read_file(simulation, script)?;
    let plan = resume::plan_continuation(
        &text,
        files.iter().map(String::as_str),
        DEFAULT_CHECKPOINT_STEM,
        run_length,
    )?;

    let (checkpoint, run_length, continuation) = match plan {
        ResumePlan::AlreadyComplete(status) => {
            println!(
                "Run '{}' is already complete (step {} of {}).",
                simulation,
                status.last_step(),
                status.declared_run_length
            );
            return Ok(());
        }
        ResumePlan::Continue {
            checkpoint,
            run_length,
            script,
        } => (checkpoint, run_length, script),
    };

    if let Some(job_script) = submit {
        ensure_runs_continuation(client, simulation, job_script)?;
    }

    let local_dir = output_dir.join(simulation);
    fs::create_dir_all(&local_dir)?;
    let local = local_dir.join(CONTINUATION_SCRIPT_NAME);
    fs::write(&local, &continuation)?;
    client.upload_file(&local, simulation, CONTINUATION_SCRIPT_NAME)?;
    println!(
        "✓ Uploaded {} resuming '{}' from step {} for {} steps",
        CONTINUATION_SCRIPT_NAME, simulation, checkpoint.step, run_length
    );

    if let Some(job_script) = submit {
        let reply = client.submit(simulation, job_script)?;
        println!("✓ Submitted {}: {}", job_script, reply);
    }
    Ok(())
}
