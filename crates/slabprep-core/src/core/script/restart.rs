use super::{TemplateError, carriage_return, join_lines, split_lines};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Comment line the restart variables are inserted in front of.
pub const GENERAL_MARKER: &str = "# General";
/// Start of the one-time equilibration block of a cold-start script.
pub const SETUP_BLOCK_MARKER: &str = "#0 Rescaling NVT";
/// Variable holding the run length of the original script.
pub const RUN_LENGTH_VARIABLE: &str = "nrun";
/// Variable holding the run length of the continuation.
pub const CONTINUATION_RUN_LENGTH_VARIABLE: &str = "nrun_cont";
/// Variable holding the restart file name.
pub const RESTART_FILE_VARIABLE: &str = "rstfile";

static READ_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*read_data\s+.*$").expect("valid regex"));
static RESET_TIMESTEP_ZERO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*reset_timestep\s+0\s*$").expect("valid regex"));
static VELOCITY_FLUID_SCALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*velocity\s+fluid\s+scale\s+").expect("valid regex"));
static RUN_ORIGINAL_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*run\s+\$\{nrun\}\s*$").expect("valid regex"));

/// What the continuation resumes from and how long it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Continuation<'a> {
    pub restart_file: &'a str,
    pub run_length: u64,
}

/// One named step of the restart pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Declares the continuation run length and restart file before `# General`.
    InsertRestartVariables,
    /// Drops the cold-start equilibration block up to `reset_timestep 0`.
    StripSetupBlock,
    /// Replaces `read_data` with `read_restart ${rstfile}`.
    LoadFromRestart,
    /// Drops `velocity fluid scale` directives; a restart carries its own velocities.
    DropVelocityRescale,
    /// Points `run ${nrun}` at the continuation run length.
    ContinueRunLength,
}

impl Stage {
    /// Stage order. The setup block goes before the directive rewrites so that nothing
    /// inside it is ever rewritten.
    pub const PIPELINE: [Stage; 5] = [
        Stage::InsertRestartVariables,
        Stage::StripSetupBlock,
        Stage::LoadFromRestart,
        Stage::DropVelocityRescale,
        Stage::ContinueRunLength,
    ];

    pub fn apply(
        self,
        lines: &[String],
        continuation: &Continuation<'_>,
    ) -> Result<Vec<String>, TemplateError> {
        match self {
            Stage::InsertRestartVariables => insert_restart_variables(lines, continuation),
            Stage::StripSetupBlock => strip_setup_block(lines),
            Stage::LoadFromRestart => load_from_restart(lines),
            Stage::DropVelocityRescale => Ok(drop_velocity_rescale(lines)),
            Stage::ContinueRunLength => continue_run_length(lines),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::InsertRestartVariables => "insert-restart-variables",
            Stage::StripSetupBlock => "strip-setup-block",
            Stage::LoadFromRestart => "load-from-restart",
            Stage::DropVelocityRescale => "drop-velocity-rescale",
            Stage::ContinueRunLength => "continue-run-length",
        };
        f.write_str(name)
    }
}

/// Derives a continuation control script from a cold-start one.
///
/// # Errors
///
/// Returns a [`TemplateError`] naming the first anchor the script is missing; no
/// partially transformed text is ever returned.
pub fn to_continuation(
    original: &str,
    restart_file: &str,
    run_length: u64,
) -> Result<String, TemplateError> {
    let continuation = Continuation {
        restart_file,
        run_length,
    };
    let (mut lines, trailing_newline) = split_lines(original);
    for stage in Stage::PIPELINE {
        lines = stage.apply(&lines, &continuation)?;
        debug!("Restart stage '{}' left {} lines", stage, lines.len());
    }
    Ok(join_lines(&lines, trailing_newline))
}

fn insert_restart_variables(
    lines: &[String],
    continuation: &Continuation<'_>,
) -> Result<Vec<String>, TemplateError> {
    let marker = lines
        .iter()
        .position(|l| l.trim_end() == GENERAL_MARKER)
        .ok_or(TemplateError::MissingMarker {
            marker: GENERAL_MARKER,
        })?;

    let cr = carriage_return(&lines[marker]);
    let mut out = Vec::with_capacity(lines.len() + 5);
    out.extend_from_slice(&lines[..marker]);
    out.push(cr.to_string());
    out.push(format!("# --- Continuation from restart ---{cr}"));
    out.push(format!(
        "variable {CONTINUATION_RUN_LENGTH_VARIABLE}   equal   {}{cr}",
        continuation.run_length
    ));
    out.push(format!(
        "variable {RESTART_FILE_VARIABLE}     string  {}{cr}",
        continuation.restart_file
    ));
    out.push(cr.to_string());
    out.extend_from_slice(&lines[marker..]);
    Ok(out)
}

fn strip_setup_block(lines: &[String]) -> Result<Vec<String>, TemplateError> {
    let start = lines
        .iter()
        .position(|l| l.contains(SETUP_BLOCK_MARKER))
        .ok_or(TemplateError::MissingMarker {
            marker: SETUP_BLOCK_MARKER,
        })?;
    let end = lines[start + 1..]
        .iter()
        .position(|l| RESET_TIMESTEP_ZERO.is_match(l))
        .map(|offset| start + 1 + offset)
        .ok_or(TemplateError::UnterminatedBlock {
            start: SETUP_BLOCK_MARKER,
            end: "reset_timestep 0",
        })?;

    Ok(lines[..start]
        .iter()
        .chain(&lines[end + 1..])
        .cloned()
        .collect())
}

fn load_from_restart(lines: &[String]) -> Result<Vec<String>, TemplateError> {
    let mut replaced = 0usize;
    let out = lines
        .iter()
        .map(|l| {
            if READ_DATA.is_match(l) {
                replaced += 1;
                format!(
                    "read_restart     ${{{RESTART_FILE_VARIABLE}}}{}",
                    carriage_return(l)
                )
            } else {
                l.clone()
            }
        })
        .collect();
    if replaced == 0 {
        return Err(TemplateError::MissingDirective {
            directive: "read_data",
        });
    }
    Ok(out)
}

fn drop_velocity_rescale(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| !VELOCITY_FLUID_SCALE.is_match(l))
        .cloned()
        .collect()
}

fn continue_run_length(lines: &[String]) -> Result<Vec<String>, TemplateError> {
    let mut replaced = 0usize;
    let out = lines
        .iter()
        .map(|l| {
            if RUN_ORIGINAL_LENGTH.is_match(l) {
                replaced += 1;
                format!(
                    "run              ${{{CONTINUATION_RUN_LENGTH_VARIABLE}}}{}",
                    carriage_return(l)
                )
            } else {
                l.clone()
            }
        })
        .collect();
    if replaced == 0 {
        return Err(TemplateError::MissingDirective {
            directive: "run ${nrun}",
        });
    }
    Ok(out)
}
