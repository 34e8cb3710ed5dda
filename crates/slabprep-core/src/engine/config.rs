use crate::core::models::params::{
    DecimalsMap, ParameterMap, ParameterValue, SimulationParameters, keys,
};
use crate::core::script::submit::SubmitFields;
use thiserror::Error;

pub const SUBMIT_SCRIPT_NAME: &str = "run.sh";
/// Control script of a continuation run, written next to the original one.
pub const CONTINUATION_SCRIPT_NAME: &str = "box_restart.in";
/// Job script that runs [`CONTINUATION_SCRIPT_NAME`] instead of the cold start.
pub const CONTINUATION_SUBMIT_SCRIPT_NAME: &str = "run_restart.sh";
pub const DENSITY_REPORT_NAME: &str = "density_check.txt";

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Incomplete configuration: missing required parameter '{0}'")]
    Incomplete(String),

    #[error("Invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },
}

impl ConfigError {
    fn invalid(key: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

fn require<'m>(map: &'m ParameterMap, key: &str) -> Result<&'m ParameterValue, ConfigError> {
    map.get(key)
        .ok_or_else(|| ConfigError::Incomplete(key.to_string()))
}

fn require_number(map: &ParameterMap, key: &str) -> Result<f64, ConfigError> {
    let value = require(map, key)?
        .as_f64()
        .ok_or_else(|| ConfigError::invalid(key, "expected a number"))?;
    if !value.is_finite() {
        return Err(ConfigError::invalid(key, "must be finite"));
    }
    Ok(value)
}

fn require_positive(map: &ParameterMap, key: &str) -> Result<f64, ConfigError> {
    let value = require_number(map, key)?;
    if value <= 0.0 {
        return Err(ConfigError::invalid(
            key,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(value)
}

fn require_rendered(map: &ParameterMap, key: &str) -> Result<String, ConfigError> {
    let rendered = require(map, key)?.to_string();
    if rendered.trim().is_empty() {
        return Err(ConfigError::invalid(key, "must not be empty"));
    }
    Ok(rendered)
}

fn require_file_name(map: &ParameterMap, key: &str) -> Result<String, ConfigError> {
    let name = require_rendered(map, key)?;
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(ConfigError::invalid(
            key,
            format!("'{name}' must be a plain file name"),
        ));
    }
    Ok(name)
}

/// Extracts and validates the geometric parameters from a parameter map.
///
/// # Errors
///
/// [`ConfigError::Incomplete`] for a missing key, [`ConfigError::InvalidParameter`]
/// for a non-numeric or non-positive value or a fluid gap outside `(0, Lz)`.
pub fn simulation_parameters(map: &ParameterMap) -> Result<SimulationParameters, ConfigError> {
    let params = SimulationParameters {
        lx: require_positive(map, keys::LX)?,
        ly: require_positive(map, keys::LY)?,
        lz: require_positive(map, keys::LZ)?,
        rho_wall: require_positive(map, keys::RHO_WALL)?,
        rho_fluid: require_positive(map, keys::RHO_FLUID)?,
        sigma: require_positive(map, keys::SIGMA)?,
        rcut: require_positive(map, keys::RCUT)?,
        fluid_gap: require_positive(map, keys::FLUID_GAP)?,
    };
    if params.fluid_gap >= params.lz {
        return Err(ConfigError::invalid(
            keys::FLUID_GAP,
            format!(
                "must be smaller than Lz ({} >= {})",
                params.fluid_gap, params.lz
            ),
        ));
    }
    Ok(params)
}

/// Extracts the submission-template fields from a parameter map.
pub fn submit_fields(map: &ParameterMap) -> Result<SubmitFields, ConfigError> {
    Ok(SubmitFields {
        node: require_rendered(map, keys::NODES)?,
        ppn: require_rendered(map, keys::PPN)?,
        queue: require_rendered(map, keys::QUEUE)?,
        simulation_name: require_rendered(map, keys::SIMULATION_NAME)?,
        lammps_exe: require_rendered(map, keys::LAMMPS_EXE)?,
        control_script: require_file_name(map, keys::CONTROL_OUTPUT)?,
    })
}

/// Names of the artifacts a generation run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    /// Run name; also the name of the run folder.
    pub simulation_name: String,
    pub data_file: String,
    pub control_script: String,
    pub submit_script: String,
    pub continuation_submit_script: String,
    pub density_report: String,
}

impl OutputNames {
    pub fn from_parameters(map: &ParameterMap) -> Result<Self, ConfigError> {
        Ok(Self {
            simulation_name: require_file_name(map, keys::SIMULATION_NAME)?,
            data_file: require_file_name(map, keys::DATA_FILE)?,
            control_script: require_file_name(map, keys::CONTROL_OUTPUT)?,
            submit_script: SUBMIT_SCRIPT_NAME.to_string(),
            continuation_submit_script: CONTINUATION_SUBMIT_SCRIPT_NAME.to_string(),
            density_report: DENSITY_REPORT_NAME.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitStage {
    pub template: String,
    pub fields: SubmitFields,
}

/// A file copied into the run folder unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtraFile {
    pub name: String,
    pub contents: String,
}

/// Everything a generation run needs, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub parameters: SimulationParameters,
    /// Values substituted into the control template.
    pub variables: ParameterMap,
    pub decimals: DecimalsMap,
    pub outputs: OutputNames,
    pub control_template: String,
    pub submit: Option<SubmitStage>,
    pub extra_files: Vec<ExtraFile>,
}

#[derive(Default)]
pub struct GenerationConfigBuilder {
    variables: Option<ParameterMap>,
    decimals: DecimalsMap,
    control_template: Option<String>,
    submit_template: Option<String>,
    extra_files: Vec<ExtraFile>,
}

impl GenerationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(mut self, variables: ParameterMap) -> Self {
        self.variables = Some(variables);
        self
    }
    pub fn decimals(mut self, decimals: DecimalsMap) -> Self {
        self.decimals = decimals;
        self
    }
    pub fn control_template(mut self, template: impl Into<String>) -> Self {
        self.control_template = Some(template.into());
        self
    }
    pub fn submit_template(mut self, template: impl Into<String>) -> Self {
        self.submit_template = Some(template.into());
        self
    }
    pub fn extra_file(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.extra_files.push(ExtraFile {
            name: name.into(),
            contents: contents.into(),
        });
        self
    }

    pub fn build(self) -> Result<GenerationConfig, ConfigError> {
        let variables = self
            .variables
            .ok_or_else(|| ConfigError::Incomplete("parameters".to_string()))?;
        let control_template = self
            .control_template
            .ok_or_else(|| ConfigError::Incomplete("control template".to_string()))?;

        let parameters = simulation_parameters(&variables)?;
        let outputs = OutputNames::from_parameters(&variables)?;
        let submit = match self.submit_template {
            Some(template) => Some(SubmitStage {
                template,
                fields: submit_fields(&variables)?,
            }),
            None => None,
        };

        let reserved = [
            outputs.data_file.as_str(),
            outputs.control_script.as_str(),
            outputs.density_report.as_str(),
            outputs.submit_script.as_str(),
            outputs.continuation_submit_script.as_str(),
        ];
        if let Some(clash) = self
            .extra_files
            .iter()
            .find(|f| reserved.contains(&f.name.as_str()))
        {
            return Err(ConfigError::invalid(
                "extra files",
                format!("'{}' would overwrite a generated artifact", clash.name),
            ));
        }

        Ok(GenerationConfig {
            parameters,
            variables,
            decimals: self.decimals,
            outputs,
            control_template,
            submit,
            extra_files: self.extra_files,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn reference_parameters() -> ParameterMap {
        let mut map = ParameterMap::new();
        map.insert(keys::LX.into(), 10.0.into());
        map.insert(keys::LY.into(), 10.0.into());
        map.insert(keys::LZ.into(), 20.0.into());
        map.insert(keys::RHO_WALL.into(), 0.75.into());
        map.insert(keys::RHO_FLUID.into(), 0.8.into());
        map.insert(keys::SIGMA.into(), 1.0.into());
        map.insert(keys::RCUT.into(), 1.5.into());
        map.insert(keys::FLUID_GAP.into(), 8.0.into());
        map.insert(keys::SIMULATION_NAME.into(), "WCA_H8_rho0_8".into());
        map.insert(keys::DATA_FILE.into(), "dataWCA.slit".into());
        map.insert(keys::CONTROL_OUTPUT.into(), "box.in".into());
        map.insert(keys::NODES.into(), "node01".into());
        map.insert(keys::PPN.into(), ParameterValue::Integer(24));
        map.insert(keys::QUEUE.into(), "enp5".into());
        map.insert(keys::LAMMPS_EXE.into(), "/opt/lammps/lmp".into());
        map.insert(keys::RUN_LENGTH.into(), ParameterValue::Integer(500000));
        map
    }

    #[test]
    fn simulation_parameters_accepts_integers_for_floats() {
        let mut map = reference_parameters();
        map.insert(keys::LZ.into(), ParameterValue::Integer(20));
        let params = simulation_parameters(&map).unwrap();
        assert_eq!(params.lz, 20.0);
        assert_eq!(params.sigma, 1.0);
    }

    #[test]
    fn missing_key_is_incomplete_configuration() {
        let mut map = reference_parameters();
        map.remove(keys::RCUT);
        assert_eq!(
            simulation_parameters(&map).unwrap_err(),
            ConfigError::Incomplete("rcutLJ11".into())
        );
    }

    #[test]
    fn non_numeric_and_non_positive_values_are_invalid() {
        let mut map = reference_parameters();
        map.insert(keys::LX.into(), "wide".into());
        assert!(matches!(
            simulation_parameters(&map),
            Err(ConfigError::InvalidParameter { key, .. }) if key == "Lx"
        ));

        let mut map = reference_parameters();
        map.insert(keys::RHO_FLUID.into(), 0.0.into());
        assert!(matches!(
            simulation_parameters(&map),
            Err(ConfigError::InvalidParameter { key, .. }) if key == "rho_fluid"
        ));
    }

    #[test]
    fn fluid_gap_must_fit_inside_the_box() {
        let mut map = reference_parameters();
        map.insert(keys::FLUID_GAP.into(), 20.0.into());
        assert!(matches!(
            simulation_parameters(&map),
            Err(ConfigError::InvalidParameter { key, .. }) if key == "fluid_gap"
        ));
    }

    #[test]
    fn builder_requires_a_control_template() {
        let result = GenerationConfigBuilder::new()
            .variables(reference_parameters())
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Incomplete("control template".into())
        );
    }

    #[test]
    fn submit_fields_are_required_only_with_a_submit_template() {
        let mut map = reference_parameters();
        map.remove(keys::LAMMPS_EXE);

        let config = GenerationConfigBuilder::new()
            .variables(map.clone())
            .control_template("run ${nrun}\n")
            .build()
            .unwrap();
        assert!(config.submit.is_none());

        let result = GenerationConfigBuilder::new()
            .variables(map)
            .control_template("run ${nrun}\n")
            .submit_template("{lammps_exe}")
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Incomplete("lammps_exe".into())
        );
    }

    #[test]
    fn submit_fields_render_integers() {
        let fields = submit_fields(&reference_parameters()).unwrap();
        assert_eq!(fields.ppn, "24");
        assert_eq!(fields.node, "node01");
        assert_eq!(fields.control_script, "box.in");
    }

    #[test]
    fn output_names_must_be_plain_file_names() {
        let mut map = reference_parameters();
        map.insert(keys::DATA_FILE.into(), "../escape.slit".into());
        assert!(matches!(
            OutputNames::from_parameters(&map),
            Err(ConfigError::InvalidParameter { key, .. }) if key == "data_file"
        ));
    }

    #[test]
    fn extra_files_cannot_shadow_artifacts() {
        let result = GenerationConfigBuilder::new()
            .variables(reference_parameters())
            .control_template("x")
            .extra_file("box.in", "y")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));

        let result = GenerationConfigBuilder::new()
            .variables(reference_parameters())
            .control_template("x")
            .extra_file(CONTINUATION_SUBMIT_SCRIPT_NAME, "y")
            .build();
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));
    }
}
