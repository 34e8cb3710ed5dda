use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Species;
use crate::core::models::configuration::SlabConfiguration;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

pub const DEFAULT_COMMENT: &str = "Converted from LAMMPS data file";

/// Display radius of fluid particles in the XYZ export, in Angstroms.
pub const DEFAULT_FLUID_RADIUS: f64 = 1.88;
/// Display radius of wall particles in the XYZ export, in Angstroms.
pub const DEFAULT_WALL_RADIUS: f64 = 3.4;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyzEntry {
    pub label: String,
    pub position: Point3<f64>,
    pub radius: f64,
}

/// A single XYZ frame whose entries carry a display radius as fifth column.
#[derive(Debug, Clone, PartialEq)]
pub struct XyzFrame {
    pub comment: String,
    pub entries: Vec<XyzEntry>,
}

impl XyzFrame {
    /// Extracts the atoms of one species from a configuration, labelled by atom type.
    pub fn from_species(config: &SlabConfiguration, species: Species, radius: f64) -> Self {
        let entries = config
            .atoms_of(species)
            .map(|atom| XyzEntry {
                label: species.type_id().to_string(),
                position: atom.position,
                radius,
            })
            .collect();
        Self {
            comment: DEFAULT_COMMENT.to_string(),
            entries,
        }
    }
}

pub struct XyzFile;

impl StructureFile for XyzFile {
    type Structure = XyzFrame;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Structure, Self::Error> {
        let mut lines = reader.lines();
        let count_line = lines.next().transpose()?.ok_or_else(|| XyzError::Parse {
            line: 1,
            message: "missing atom count".into(),
        })?;
        let count: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            message: format!("invalid atom count '{}'", count_line.trim()),
        })?;
        let comment = lines.next().transpose()?.unwrap_or_default();

        let mut entries = Vec::with_capacity(count);
        for (offset, line_res) in lines.enumerate() {
            let line = line_res?;
            let line_num = offset + 3;
            if line.trim().is_empty() {
                continue;
            }
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    message: format!("expected at least 4 columns, found {}", parts.len()),
                });
            }
            let number = |idx: usize| -> Result<f64, XyzError> {
                parts[idx].parse().map_err(|_| XyzError::Parse {
                    line: line_num,
                    message: format!("invalid number '{}'", parts[idx]),
                })
            };
            let radius = if parts.len() > 4 { number(4)? } else { 0.0 };
            entries.push(XyzEntry {
                label: parts[0].to_string(),
                position: Point3::new(number(1)?, number(2)?, number(3)?),
                radius,
            });
        }

        if entries.len() != count {
            return Err(XyzError::Parse {
                line: 1,
                message: format!("declared {} atoms but found {}", count, entries.len()),
            });
        }
        Ok(XyzFrame { comment, entries })
    }

    fn write_to(structure: &Self::Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "{}", structure.entries.len())?;
        writeln!(writer, "{}", structure.comment)?;
        for entry in &structure.entries {
            writeln!(
                writer,
                "{} {:.3} {:.3} {:.3} {:.3}",
                entry.label, entry.position.x, entry.position.y, entry.position.z, entry.radius
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Vector3;
    use std::io::{BufReader, Cursor};

    fn config() -> SlabConfiguration {
        SlabConfiguration::new(
            Vector3::new(5.0, 5.0, 10.0),
            vec![
                Atom::new(1, Species::Fluid, Point3::new(1.0, 1.0, 5.0)),
                Atom::new(2, Species::Wall, Point3::new(0.5, 0.5, 0.5)),
                Atom::new(3, Species::Wall, Point3::new(1.5, 0.5, 0.5)),
            ],
        )
    }

    #[test]
    fn from_species_keeps_only_requested_species() {
        let frame = XyzFrame::from_species(&config(), Species::Wall, DEFAULT_WALL_RADIUS);
        assert_eq!(frame.entries.len(), 2);
        assert!(frame.entries.iter().all(|e| e.label == "2" && e.radius == 3.4));
    }

    #[test]
    fn write_renders_count_comment_and_radius_column() {
        let frame = XyzFrame::from_species(&config(), Species::Fluid, DEFAULT_FLUID_RADIUS);
        let text = XyzFile::write_to_string(&frame).unwrap();
        assert_eq!(
            text,
            "1\nConverted from LAMMPS data file\n1 1.000 1.000 5.000 1.880\n"
        );
    }

    #[test]
    fn read_parses_written_frame() {
        let frame = XyzFrame::from_species(&config(), Species::Wall, DEFAULT_WALL_RADIUS);
        let text = XyzFile::write_to_string(&frame).unwrap();
        let parsed = XyzFile::read_from(&mut BufReader::new(Cursor::new(text))).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn read_rejects_count_mismatch() {
        let text = "3\ncomment\n1 0.0 0.0 0.0\n";
        let result = XyzFile::read_from(&mut BufReader::new(Cursor::new(text)));
        assert!(matches!(result, Err(XyzError::Parse { line: 1, .. })));
    }
}
