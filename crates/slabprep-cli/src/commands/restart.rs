use crate::cli::RestartArgs;
use crate::error::{CliError, Result};
use slabprep::core::script::restart;
use std::fs;
use tracing::info;

pub fn run(args: RestartArgs) -> Result<()> {
    if args.run_length == 0 {
        return Err(CliError::Argument(
            "the continuation run length must be positive".to_string(),
        ));
    }
    let original = fs::read_to_string(&args.input)?;
    let continuation = restart::to_continuation(&original, &args.restart_file, args.run_length)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &continuation)?;
            info!("Continuation script written to {:?}", path);
            println!(
                "✓ Continuation from '{}' for {} steps written to {}",
                args.restart_file,
                args.run_length,
                path.display()
            );
        }
        None => print!("{continuation}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "\
variable nrun equal 500000
# General
read_data dataWCA.slit
#0 Rescaling NVT
run 10000
reset_timestep 0
run ${nrun}
";

    #[test]
    fn writes_the_continuation_next_to_the_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("box.in");
        let output = dir.path().join("box_restart.in");
        fs::write(&input, SCRIPT).unwrap();

        run(RestartArgs {
            input,
            restart_file: "restart.300000".into(),
            run_length: 200000,
            output: Some(output.clone()),
        })
        .unwrap();

        let text = fs::read_to_string(output).unwrap();
        assert!(text.contains("variable nrun_cont   equal   200000"));
        assert!(text.ends_with("run              ${nrun_cont}\n"));
    }

    #[test]
    fn zero_run_length_is_rejected() {
        let result = run(RestartArgs {
            input: "box.in".into(),
            restart_file: "restart.1".into(),
            run_length: 0,
            output: None,
        });
        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn malformed_scripts_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("box.in");
        let output = dir.path().join("box_restart.in");
        fs::write(&input, SCRIPT.replace("# General\n", "")).unwrap();

        let result = run(RestartArgs {
            input,
            restart_file: "restart.300000".into(),
            run_length: 200000,
            output: Some(output.clone()),
        });
        assert!(matches!(result, Err(CliError::Engine(_))));
        assert!(!output.exists());
    }
}
