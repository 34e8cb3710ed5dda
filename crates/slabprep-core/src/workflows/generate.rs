use crate::core::io::lammps::LammpsDataFile;
use crate::core::io::sink::ArtifactSink;
use crate::core::io::traits::StructureFile;
use crate::core::script::{submit, template};
use crate::engine::config::{CONTINUATION_SCRIPT_NAME, GenerationConfig};
use crate::engine::density::{self, DensityReport};
use crate::engine::error::EngineError;
use crate::engine::geometry;
use crate::engine::lattice::{self, GeneratedLattice, RegionCounts};
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{debug, info, instrument, warn};

/// What a successful generation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub simulation_name: String,
    pub counts: RegionCounts,
    pub density: DensityReport,
    /// Artifact names in the order they were written.
    pub artifacts: Vec<String>,
}

/// A rendered artifact waiting to be handed to the sink.
struct Artifact {
    name: String,
    contents: String,
}

#[instrument(skip_all, name = "generation_workflow", fields(simulation = %config.outputs.simulation_name))]
pub fn run(
    config: &GenerationConfig,
    sink: &mut impl ArtifactSink,
    reporter: &ProgressReporter,
) -> Result<GenerationSummary, EngineError> {
    // === Phase 1: Geometry ===
    let layout = reporter.phase("Planning geometry", || {
        geometry::plan(&config.parameters)
    })?;

    // === Phase 2: Lattice enumeration ===
    reporter.report(Progress::PhaseStart {
        name: "Generating lattice",
    });
    let lattice = lattice::generate(&layout, reporter);
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Density audit ===
    let density = density::audit(&layout, &lattice.counts);
    for (species, entry) in [("fluid", &density.fluid), ("wall", &density.wall)] {
        if !entry.within_tolerance() {
            let message = format!(
                "Achieved {} density {:.4} deviates {:.1}% from the requested {:.4}.",
                species,
                entry.achieved,
                entry.relative_deviation() * 100.0,
                entry.requested
            );
            warn!("{}", message);
            reporter.report(Progress::Message(message));
        }
    }

    // === Phase 4: Rendering ===
    let artifacts = reporter.phase("Rendering artifacts", || {
        render_artifacts(config, &lattice, &density)
    })?;

    // === Phase 5: Writing ===
    reporter.report(Progress::PhaseStart {
        name: "Writing artifacts",
    });
    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        sink.write_artifact(&artifact.name, &artifact.contents)
            .map_err(|source| EngineError::Artifact {
                artifact: artifact.name.clone(),
                source,
            })?;
        written.push(artifact.name);
    }
    reporter.report(Progress::PhaseFinish);

    info!(
        "Run '{}' prepared with {} atoms in {} artifact(s).",
        config.outputs.simulation_name,
        lattice.counts.total(),
        written.len()
    );

    Ok(GenerationSummary {
        simulation_name: config.outputs.simulation_name.clone(),
        counts: lattice.counts,
        density,
        artifacts: written,
    })
}

fn render_artifacts(
    config: &GenerationConfig,
    lattice: &GeneratedLattice,
    density: &DensityReport,
) -> Result<Vec<Artifact>, EngineError> {
    let outputs = &config.outputs;
    let mut artifacts = vec![
        Artifact {
            name: outputs.data_file.clone(),
            contents: LammpsDataFile::write_to_string(&lattice.configuration)?,
        },
        Artifact {
            name: outputs.density_report.clone(),
            contents: density.render(),
        },
        Artifact {
            name: outputs.control_script.clone(),
            contents: template::rewrite_text(
                &config.control_template,
                &config.variables,
                &config.decimals,
            ),
        },
    ];

    if let Some(stage) = &config.submit {
        let cold_start = submit::render(&stage.template, &stage.fields)?;
        let continuation = submit::render(
            &stage.template,
            &stage.fields.for_control_script(CONTINUATION_SCRIPT_NAME),
        )?;
        let continues = continuation != cold_start;
        artifacts.push(Artifact {
            name: outputs.submit_script.clone(),
            contents: cold_start,
        });
        if continues {
            artifacts.push(Artifact {
                name: outputs.continuation_submit_script.clone(),
                contents: continuation,
            });
        } else {
            debug!("Submit template has no {{control_script}} field; no continuation job script.");
        }
    }

    artifacts.extend(config.extra_files.iter().map(|file| Artifact {
        name: file.name.clone(),
        contents: file.contents.clone(),
    }));
    Ok(artifacts)
}
