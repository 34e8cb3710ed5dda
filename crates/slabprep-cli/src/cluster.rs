use crate::cli::ConnectionArgs;
use crate::error::{CliError, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

/// Operations on the remote cluster that hosts the run folders.
///
/// Every call is synchronous and independent; callers may retry a failed call.
pub trait ClusterClient {
    /// Raw queue listing of the current user's jobs.
    fn job_status(&self) -> Result<String>;
    /// Names of the run folders in the simulation directory.
    fn list_simulations(&self) -> Result<Vec<String>>;
    fn list_files(&self, simulation: &str) -> Result<Vec<String>>;
    fn read_file(&self, simulation: &str, name: &str) -> Result<String>;
    /// Copies a whole run folder into `dest`.
    fn fetch_simulation(&self, simulation: &str, dest: &Path) -> Result<PathBuf>;
    /// Copies one file of a run into `dest`.
    fn fetch_file(&self, simulation: &str, name: &str, dest: &Path) -> Result<PathBuf>;
    fn upload_file(&self, local: &Path, simulation: &str, name: &str) -> Result<()>;
    /// Submits a job script from inside the run folder and returns the scheduler's reply.
    fn submit(&self, simulation: &str, script: &str) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub host: String,
    pub user: String,
    pub key: PathBuf,
    pub sim_dir: String,
}

impl From<ConnectionArgs> for ConnectionSettings {
    fn from(args: ConnectionArgs) -> Self {
        Self {
            host: args.host,
            user: args.user,
            key: args.key,
            sim_dir: args.sim_dir,
        }
    }
}

/// Single-quotes a word for the remote shell.
fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

fn check(output: Output, what: &str) -> Result<String> {
    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr
    };
    Err(CliError::Remote(format!("{what}: {detail}")))
}

/// [`ClusterClient`] backed by the system `ssh` and `scp` binaries in batch mode.
#[derive(Debug, Clone)]
pub struct SshCluster {
    settings: ConnectionSettings,
}

impl SshCluster {
    pub fn new(settings: ConnectionSettings) -> Self {
        Self { settings }
    }

    fn destination(&self) -> String {
        format!("{}@{}", self.settings.user, self.settings.host)
    }

    fn remote_dir(&self, simulation: &str) -> String {
        format!(
            "{}/{}",
            self.settings.sim_dir.trim_end_matches('/'),
            simulation
        )
    }

    fn remote_path(&self, simulation: &str, name: &str) -> String {
        format!("{}/{}", self.remote_dir(simulation), name)
    }

    fn ssh_command(&self, remote_command: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg("-i")
            .arg(&self.settings.key)
            .arg("-o")
            .arg("BatchMode=yes")
            .arg(self.destination())
            .arg(remote_command);
        cmd
    }

    fn scp_command(&self, recursive: bool, from: &str, to: &str) -> Command {
        let mut cmd = Command::new("scp");
        cmd.arg("-i")
            .arg(&self.settings.key)
            .arg("-o")
            .arg("BatchMode=yes");
        if recursive {
            cmd.arg("-r");
        }
        cmd.arg(from).arg(to);
        cmd
    }

    fn ssh(&self, remote_command: &str) -> Result<String> {
        debug!("ssh {}: {}", self.destination(), remote_command);
        let output = self.ssh_command(remote_command).output()?;
        check(output, remote_command)
    }

    fn download(&self, recursive: bool, remote: &str, dest: &Path) -> Result<()> {
        std::fs::create_dir_all(dest)?;
        let from = format!("{}:{}", self.destination(), remote);
        let to = dest.to_string_lossy();
        debug!("scp {} -> {}", from, to);
        let output = self.scp_command(recursive, &from, &to).output()?;
        check(output, &format!("scp {from}")).map(drop)
    }
}

fn non_empty_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

impl ClusterClient for SshCluster {
    fn job_status(&self) -> Result<String> {
        self.ssh(&format!("qstat -u {}", shell_quote(&self.settings.user)))
    }

    fn list_simulations(&self) -> Result<Vec<String>> {
        let out = self.ssh(&format!("ls -1 {}", shell_quote(&self.settings.sim_dir)))?;
        Ok(non_empty_lines(&out))
    }

    fn list_files(&self, simulation: &str) -> Result<Vec<String>> {
        let out = self.ssh(&format!("ls -1 {}", shell_quote(&self.remote_dir(simulation))))?;
        Ok(non_empty_lines(&out))
    }

    fn read_file(&self, simulation: &str, name: &str) -> Result<String> {
        self.ssh(&format!(
            "cat {}",
            shell_quote(&self.remote_path(simulation, name))
        ))
    }

    fn fetch_simulation(&self, simulation: &str, dest: &Path) -> Result<PathBuf> {
        self.download(true, &self.remote_dir(simulation), dest)?;
        Ok(dest.join(simulation))
    }

    fn fetch_file(&self, simulation: &str, name: &str, dest: &Path) -> Result<PathBuf> {
        self.download(false, &self.remote_path(simulation, name), dest)?;
        Ok(dest.join(name))
    }

    fn upload_file(&self, local: &Path, simulation: &str, name: &str) -> Result<()> {
        let to = format!(
            "{}:{}",
            self.destination(),
            self.remote_path(simulation, name)
        );
        let from = local.to_string_lossy();
        debug!("scp {} -> {}", from, to);
        let output = self.scp_command(false, &from, &to).output()?;
        check(output, &format!("scp {from}")).map(drop)
    }

    fn submit(&self, simulation: &str, script: &str) -> Result<String> {
        let out = self.ssh(&format!(
            "cd {} && qsub {}",
            shell_quote(&self.remote_dir(simulation)),
            shell_quote(script)
        ))?;
        Ok(out.trim().to_string())
    }
}
