use crate::cli::StatusArgs;
use crate::error::Result;
use slabprep::workflows::resume::{self, CompletionStatus};
use std::fs;

pub(crate) fn describe(status: &CompletionStatus) -> String {
    let last = status
        .last
        .as_ref()
        .map_or_else(|| "none".to_string(), |c| format!("{} ({})", c.step, c.file_name));
    let state = if status.finished() {
        "finished"
    } else {
        "unfinished"
    };
    format!(
        "{state}: last checkpoint {last}, run length {}",
        status.declared_run_length
    )
}

pub fn run(args: StatusArgs) -> Result<()> {
    let script = fs::read_to_string(&args.input)?;
    let status = resume::completion_status(
        &script,
        args.files.iter().map(String::as_str),
        &args.stem,
    )?;
    println!("{}", describe(&status));
    Ok(())
}
