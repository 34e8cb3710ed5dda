use crate::core::cluster::checkpoints::{Checkpoint, latest_checkpoint};
use crate::core::script::restart::{self, RUN_LENGTH_VARIABLE};
use crate::engine::error::EngineError;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, instrument};

static EQUAL_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*variable\s+(\S+)\s+equal\s+(\S+)").expect("valid regex")
});

/// Reads the value of `variable <name> equal <N>` from a control script.
///
/// Integral float values (`5e5`, `500000.0`) are accepted. The first declaration wins.
pub fn declared_run_length(script: &str, variable: &str) -> Option<u64> {
    script.lines().find_map(|line| {
        let caps = EQUAL_DECLARATION.captures(line)?;
        if &caps[1] != variable {
            return None;
        }
        let raw = &caps[2];
        raw.parse::<u64>().ok().or_else(|| {
            let value: f64 = raw.parse().ok()?;
            (value >= 0.0 && value.fract() == 0.0).then_some(value as u64)
        })
    })
}

/// How far a run got relative to the run length its control script declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionStatus {
    pub last: Option<Checkpoint>,
    pub declared_run_length: u64,
}

impl CompletionStatus {
    pub fn last_step(&self) -> u64 {
        self.last.as_ref().map_or(0, |c| c.step)
    }

    /// A run is finished once a checkpoint at or beyond the declared run length exists.
    pub fn finished(&self) -> bool {
        self.last
            .as_ref()
            .is_some_and(|c| c.step >= self.declared_run_length)
    }

    pub fn remaining_steps(&self) -> u64 {
        self.declared_run_length.saturating_sub(self.last_step())
    }
}

/// Determines the completion state of a run from its control script and the names of
/// the files in its folder.
///
/// # Errors
///
/// Returns [`EngineError::MissingRunLength`] when the script declares no `nrun`.
pub fn completion_status<'a>(
    script: &str,
    file_names: impl IntoIterator<Item = &'a str>,
    stem: &str,
) -> Result<CompletionStatus, EngineError> {
    let declared_run_length = declared_run_length(script, RUN_LENGTH_VARIABLE)
        .ok_or_else(|| EngineError::MissingRunLength(RUN_LENGTH_VARIABLE.to_string()))?;
    Ok(CompletionStatus {
        last: latest_checkpoint(file_names, stem),
        declared_run_length,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumePlan {
    AlreadyComplete(CompletionStatus),
    Continue {
        checkpoint: Checkpoint,
        run_length: u64,
        /// The continuation control script.
        script: String,
    },
}

/// Plans the continuation of a run from its latest checkpoint.
///
/// `run_length` defaults to the steps remaining until the declared run length.
///
/// # Errors
///
/// Fails when the script declares no run length, when an unfinished run has no
/// checkpoint to resume from, or when the restart transform rejects the script.
#[instrument(skip_all, name = "resume_workflow")]
pub fn plan_continuation<'a>(
    script: &str,
    file_names: impl IntoIterator<Item = &'a str>,
    stem: &str,
    run_length: Option<u64>,
) -> Result<ResumePlan, EngineError> {
    let status = completion_status(script, file_names, stem)?;
    if status.finished() {
        info!(
            "Run already complete at step {} of {}.",
            status.last_step(),
            status.declared_run_length
        );
        return Ok(ResumePlan::AlreadyComplete(status));
    }

    let run_length = run_length.unwrap_or_else(|| status.remaining_steps());
    let checkpoint = status
        .last
        .ok_or_else(|| EngineError::NoCheckpoint(stem.to_string()))?;
    let script = restart::to_continuation(script, &checkpoint.file_name, run_length)?;
    info!(
        "Continuing from '{}' (step {}) for {} steps.",
        checkpoint.file_name, checkpoint.step, run_length
    );

    Ok(ResumePlan::Continue {
        checkpoint,
        run_length,
        script,
    })
}
