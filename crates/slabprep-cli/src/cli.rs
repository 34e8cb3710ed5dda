use clap::{Args, Parser, Subcommand};
use slabprep::core::io::xyz::{DEFAULT_FLUID_RADIUS, DEFAULT_WALL_RADIUS};
use slabprep::engine::config::CONTINUATION_SUBMIT_SCRIPT_NAME;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    name = "slabprep",
    author,
    version,
    about = "slabprep - prepares wall-fluid slab simulations: lattice data files, control scripts, submission scripts and restart continuations.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a run folder: data file, density check, control and submission scripts.
    Generate(GenerateArgs),
    /// Turn a cold-start control script into a continuation from a restart file.
    Restart(RestartArgs),
    /// Check whether a run has reached its declared run length.
    Status(StatusArgs),
    /// Split a generated data file into one XYZ file per species.
    ExportXyz(ExportXyzArgs),
    /// Inspect, fetch and resume runs on the compute cluster.
    Remote(RemoteArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Path to the run configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Directory the run folder is created in.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Set a parameter, overriding the config file.
    /// Can be used multiple times. Example: -S fluid_gap=12.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    /// Derive `simulation_name` as `<PREFIX>_H<gap>_rho0_<density digits>`.
    ///
    /// Leading zeros of the density digits are kept: 0.05 gives `rho0_05`, not
    /// the `rho0_5` of folders named by older tooling.
    #[arg(long, value_name = "PREFIX")]
    pub name_prefix: Option<String>,
}

/// Arguments for the `restart` subcommand.
#[derive(Args, Debug)]
pub struct RestartArgs {
    /// The cold-start control script.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Restart file the continuation reads.
    #[arg(short = 'r', long, required = true, value_name = "FILE")]
    pub restart_file: String,

    /// Number of steps the continuation runs.
    #[arg(short = 'n', long, required = true, value_name = "STEPS")]
    pub run_length: u64,

    /// Output path; printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `status` subcommand.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// The control script declaring the run length.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Names of the files present in the run folder.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Stem of the restart files.
    #[arg(long, value_name = "STEM", default_value = slabprep::core::cluster::checkpoints::DEFAULT_CHECKPOINT_STEM)]
    pub stem: String,
}

/// Arguments for the `export-xyz` subcommand.
#[derive(Args, Debug)]
pub struct ExportXyzArgs {
    /// Generated LAMMPS data file.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Directory the XYZ files are written to.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    #[arg(long, value_name = "ANGSTROM", default_value_t = DEFAULT_FLUID_RADIUS)]
    pub fluid_radius: f64,

    #[arg(long, value_name = "ANGSTROM", default_value_t = DEFAULT_WALL_RADIUS)]
    pub wall_radius: f64,
}

/// Arguments for the `remote` subcommand.
#[derive(Args, Debug)]
pub struct RemoteArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: RemoteCommands,
}

#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Cluster login host.
    #[arg(long, env = "CLUSTER_HOST", value_name = "HOST")]
    pub host: String,

    #[arg(long, env = "CLUSTER_USERNAME", value_name = "USER")]
    pub user: String,

    /// Private key used for SSH and SCP.
    #[arg(long, env = "CLUSTER_KEY_PATH", value_name = "PATH")]
    pub key: PathBuf,

    /// Remote directory holding one folder per run.
    #[arg(long, env = "CLUSTER_SIMULATION_DIR", value_name = "DIR")]
    pub sim_dir: String,
}

/// Available commands for cluster operations.
#[derive(Subcommand, Debug)]
pub enum RemoteCommands {
    /// Show the queue status of your jobs.
    Jobs,
    /// List the run folders on the cluster.
    List,
    /// Download a run folder, or a single file of it.
    Fetch {
        simulation: String,
        /// Fetch only this file of the run.
        #[arg(long, value_name = "FILE")]
        file: Option<String>,
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },
    /// Download one file from every run folder.
    FetchAll {
        #[arg(long, value_name = "FILE", default_value = "densF.dat")]
        file: String,
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },
    /// List runs that have not reached their declared run length.
    Unfinished {
        /// Name of the control script inside each run folder.
        #[arg(long, value_name = "FILE", default_value = "box.in")]
        script: String,
    },
    /// Upload a continuation script for an unfinished run.
    Resume {
        simulation: String,
        /// Steps to run; defaults to the remaining steps.
        #[arg(short = 'n', long, value_name = "STEPS")]
        run_length: Option<u64>,
        #[arg(long, value_name = "FILE", default_value = "box.in")]
        script: String,
        /// Submit a job script that runs the continuation after uploading it
        /// [default when given without a value: run_restart.sh].
        #[arg(
            long,
            value_name = "FILE",
            num_args = 0..=1,
            default_missing_value = CONTINUATION_SUBMIT_SCRIPT_NAME
        )]
        submit: Option<String>,
        /// Local directory a copy of the continuation script is kept in.
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },
}
