use crate::core::io::traits::StructureFile;
use crate::core::models::atom::{Atom, Species};
use crate::core::models::configuration::SlabConfiguration;
use crate::core::utils::format::plain_float;
use nalgebra::{Point3, Vector3};
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: DataFileParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(&'static str),
}

#[derive(Debug, Error)]
pub enum DataFileParseErrorKind {
    #[error("Invalid integer for {field} (value: '{value}')")]
    InvalidInt { field: &'static str, value: String },
    #[error("Invalid float for {field} (value: '{value}')")]
    InvalidFloat { field: &'static str, value: String },
    #[error("Unknown atom type '{0}'")]
    UnknownAtomType(String),
    #[error("Expected at least {expected} columns, found {found}")]
    TooFewColumns { expected: usize, found: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Header,
    Masses,
    Atoms,
    Other,
}

fn parse_int<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, DataFileError> {
    value.parse().map_err(|_| DataFileError::Parse {
        line,
        kind: DataFileParseErrorKind::InvalidInt {
            field,
            value: value.into(),
        },
    })
}

fn parse_float(value: &str, field: &'static str, line: usize) -> Result<f64, DataFileError> {
    value.parse().map_err(|_| DataFileError::Parse {
        line,
        kind: DataFileParseErrorKind::InvalidFloat {
            field,
            value: value.into(),
        },
    })
}

fn parse_species(value: &str, line: usize) -> Result<Species, DataFileError> {
    value
        .parse::<u8>()
        .ok()
        .and_then(Species::from_type_id)
        .ok_or_else(|| DataFileError::Parse {
            line,
            kind: DataFileParseErrorKind::UnknownAtomType(value.into()),
        })
}

/// The LAMMPS data file written for the MD engine (atom style `atomic`).
pub struct LammpsDataFile;

impl StructureFile for LammpsDataFile {
    type Structure = SlabConfiguration;
    type Error = DataFileError;

    fn read_from(reader: &mut impl BufRead) -> Result<Self::Structure, Self::Error> {
        let mut title = None;
        let mut declared_atoms: Option<usize> = None;
        let mut bounds: [Option<f64>; 3] = [None; 3];
        let mut masses = Vec::new();
        let mut atoms = Vec::new();
        let mut section = Section::Header;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if title.is_none() {
                title = Some(line.trim_end().to_string());
                continue;
            }

            let content = line.split('#').next().unwrap_or("").trim();
            if content.is_empty() {
                continue;
            }
            let parts: Vec<&str> = content.split_whitespace().collect();

            match parts.as_slice() {
                ["Masses"] => {
                    section = Section::Masses;
                    continue;
                }
                ["Atoms"] => {
                    section = Section::Atoms;
                    continue;
                }
                [word] if word.chars().all(|c| c.is_ascii_alphabetic()) => {
                    section = Section::Other;
                    continue;
                }
                _ => {}
            }

            match section {
                Section::Header => match parts.as_slice() {
                    [n, "atoms"] => declared_atoms = Some(parse_int(n, "atom count", line_num)?),
                    [_, "atom", "types"] => {}
                    [lo, hi, lo_name, _] if lo_name.ends_with("lo") => {
                        let axis = match *lo_name {
                            "xlo" => 0,
                            "ylo" => 1,
                            "zlo" => 2,
                            _ => continue,
                        };
                        let lo = parse_float(lo, "box lower bound", line_num)?;
                        let hi = parse_float(hi, "box upper bound", line_num)?;
                        if lo != 0.0 {
                            return Err(DataFileError::Inconsistency(format!(
                                "box must start at the origin, found {lo_name} = {lo}"
                            )));
                        }
                        bounds[axis] = Some(hi);
                    }
                    _ => {}
                },
                Section::Masses => {
                    if parts.len() < 2 {
                        return Err(DataFileError::Parse {
                            line: line_num,
                            kind: DataFileParseErrorKind::TooFewColumns {
                                expected: 2,
                                found: parts.len(),
                            },
                        });
                    }
                    let species = parse_species(parts[0], line_num)?;
                    let mass = parse_float(parts[1], "mass", line_num)?;
                    masses.push((species, mass));
                }
                Section::Atoms => {
                    if parts.len() < 5 {
                        return Err(DataFileError::Parse {
                            line: line_num,
                            kind: DataFileParseErrorKind::TooFewColumns {
                                expected: 5,
                                found: parts.len(),
                            },
                        });
                    }
                    let id: usize = parse_int(parts[0], "atom id", line_num)?;
                    let species = parse_species(parts[1], line_num)?;
                    let x = parse_float(parts[2], "x coordinate", line_num)?;
                    let y = parse_float(parts[3], "y coordinate", line_num)?;
                    let z = parse_float(parts[4], "z coordinate", line_num)?;
                    atoms.push(Atom::new(id, species, Point3::new(x, y, z)));
                }
                Section::Other => {}
            }
        }

        let title = title.ok_or(DataFileError::MissingRecord("title line"))?;
        let declared = declared_atoms.ok_or(DataFileError::MissingRecord("atom count"))?;
        let [Some(lx), Some(ly), Some(lz)] = bounds else {
            return Err(DataFileError::MissingRecord("box bounds"));
        };
        if declared != atoms.len() {
            return Err(DataFileError::Inconsistency(format!(
                "header declares {} atoms but the Atoms section holds {}",
                declared,
                atoms.len()
            )));
        }

        Ok(SlabConfiguration {
            title,
            box_extent: Vector3::new(lx, ly, lz),
            masses,
            atoms,
        })
    }

    fn write_to(structure: &Self::Structure, writer: &mut impl Write) -> Result<(), Self::Error> {
        // The atom count header is only known once every atom line has been rendered.
        let mut body = Vec::with_capacity(structure.atoms.len() * 32);
        let mut written = 0usize;
        for atom in &structure.atoms {
            if atom.id != written + 1 {
                return Err(DataFileError::Inconsistency(format!(
                    "atom ids must be contiguous from 1, found {} at position {}",
                    atom.id,
                    written + 1
                )));
            }
            writeln!(
                body,
                "{} {} {:.3} {:.3} {:.3}",
                atom.id,
                atom.species.type_id(),
                atom.position.x,
                atom.position.y,
                atom.position.z
            )?;
            written += 1;
        }

        writeln!(writer, "{}", structure.title)?;
        writeln!(writer)?;
        writeln!(writer, "{} atoms", written)?;
        writeln!(writer, "{} atom types", structure.masses.len())?;
        writeln!(writer)?;
        for (extent, axis) in structure.box_extent.iter().zip(["x", "y", "z"]) {
            writeln!(writer, "0.0 {} {axis}lo {axis}hi", plain_float(*extent))?;
        }
        writeln!(writer)?;
        writeln!(writer, "Masses")?;
        writeln!(writer)?;
        for (species, mass) in &structure.masses {
            writeln!(writer, "{} {}", species.type_id(), plain_float(*mass))?;
        }
        writeln!(writer)?;
        writeln!(writer, "Atoms")?;
        writeln!(writer)?;
        writer.write_all(&body)?;
        Ok(())
    }
}
