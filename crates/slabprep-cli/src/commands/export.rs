use crate::cli::ExportXyzArgs;
use crate::error::{CliError, Result};
use slabprep::core::io::lammps::LammpsDataFile;
use slabprep::core::io::traits::StructureFile;
use slabprep::core::io::xyz::{XyzFile, XyzFrame};
use slabprep::core::models::atom::Species;
use std::fs;
use tracing::info;

pub fn run(args: ExportXyzArgs) -> Result<()> {
    info!("Loading data file from {:?}", &args.input);
    let configuration =
        LammpsDataFile::read_from_path(&args.input).map_err(|e| CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        })?;

    fs::create_dir_all(&args.output_dir)?;
    for species in Species::ALL {
        let radius = match species {
            Species::Fluid => args.fluid_radius,
            Species::Wall => args.wall_radius,
        };
        let frame = XyzFrame::from_species(&configuration, species, radius);
        let path = args
            .output_dir
            .join(format!("species_{}.xyz", species.type_id()));
        XyzFile::write_to_path(&frame, &path).map_err(|e| CliError::FileParsing {
            path: path.clone(),
            source: e.into(),
        })?;
        println!(
            "✓ {} {} atoms written to {}",
            frame.entries.len(),
            species,
            path.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
LAMMPS Description

3 atoms
2 atom types

0.0 10.0 xlo xhi
0.0 10.0 ylo yhi
0.0 20.0 zlo zhi

Masses

1 1.0
2 1.0

Atoms

1 1 0.539 0.539 6.539
2 2 0.556 0.556 0.625
3 2 1.667 0.556 0.625
";

    #[test]
    fn splits_atoms_by_species() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("dataWCA.slit");
        fs::write(&input, DATA).unwrap();
        let out = dir.path().join("xyz");

        run(ExportXyzArgs {
            input,
            output_dir: out.clone(),
            fluid_radius: 1.88,
            wall_radius: 3.4,
        })
        .unwrap();

        let fluid = fs::read_to_string(out.join("species_1.xyz")).unwrap();
        assert_eq!(
            fluid,
            "1\nConverted from LAMMPS data file\n1 0.539 0.539 6.539 1.880\n"
        );
        let wall = fs::read_to_string(out.join("species_2.xyz")).unwrap();
        assert!(wall.starts_with("2\n"));
        assert!(wall.contains("2 1.667 0.556 0.625 3.400"));
    }

    #[test]
    fn unreadable_data_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.slit");
        fs::write(&input, "title\n\n5 atoms\n").unwrap();
        let result = run(ExportXyzArgs {
            input: input.clone(),
            output_dir: dir.path().to_path_buf(),
            fluid_radius: 1.88,
            wall_radius: 3.4,
        });
        assert!(matches!(result, Err(CliError::FileParsing { path, .. }) if path == input));
    }
}
