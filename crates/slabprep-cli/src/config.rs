use crate::error::{CliError, Result};
use serde::Deserialize;
use slabprep::core::cluster::queues;
use slabprep::core::models::params::{DecimalsMap, ParameterMap, ParameterValue, keys};
use slabprep::core::utils::naming::derive_simulation_name;
use slabprep::engine::config::{GenerationConfig, GenerationConfigBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct TemplatePaths {
    control: PathBuf,
    submit: Option<PathBuf>,
    #[serde(default)]
    copy: Vec<PathBuf>,
}

/// The run configuration file as written by the user.
#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    parameters: ParameterMap,
    #[serde(default)]
    decimals: DecimalsMap,
    templates: TemplatePaths,
    /// Directory relative template paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    pub fn parameters(&self) -> &ParameterMap {
        &self.parameters
    }

    /// Applies `KEY=VALUE` overrides; values parse as integer, then float, then text.
    pub fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
                CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                ))
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. The key is empty.",
                    kv_pair
                )));
            }
            let value = ParameterValue::parse_loose(value);
            debug!("Overriding parameter '{}' with {:?}", key, value);
            self.parameters.insert(key.to_string(), value);
        }
        Ok(())
    }

    /// Sets `simulation_name` from the prefix, the fluid gap and the fluid density.
    pub fn apply_name_prefix(&mut self, prefix: &str) -> Result<()> {
        let number = |key: &str| -> Result<f64> {
            self.parameters
                .get(key)
                .and_then(ParameterValue::as_f64)
                .ok_or_else(|| {
                    CliError::Config(format!(
                        "--name-prefix needs a numeric '{}' parameter.",
                        key
                    ))
                })
        };
        let name = derive_simulation_name(
            prefix,
            number(keys::FLUID_GAP)?,
            number(keys::RHO_FLUID)?,
        );
        info!("Derived simulation name '{}'", name);
        self.parameters
            .insert(keys::SIMULATION_NAME.to_string(), ParameterValue::Text(name));
        Ok(())
    }

    /// Fills `queue` from the node table when it is absent and `nodes` is a known node.
    fn fill_queue(&mut self) {
        if self.parameters.contains_key(keys::QUEUE) {
            return;
        }
        let Some(node) = self.parameters.get(keys::NODES).map(ToString::to_string) else {
            return;
        };
        if let Some(queue) = queues::queue_for_node(&node) {
            debug!("Using queue '{}' for node '{}'", queue, node);
            self.parameters
                .insert(keys::QUEUE.to_string(), ParameterValue::from(queue));
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    fn read_text(&self, path: &Path) -> Result<String> {
        let resolved = self.resolve(path);
        std::fs::read_to_string(&resolved).map_err(|e| CliError::FileParsing {
            path: resolved,
            source: e.into(),
        })
    }

    /// Reads the templates and copied files and validates everything into a
    /// [`GenerationConfig`].
    pub fn into_generation_config(mut self) -> Result<GenerationConfig> {
        self.fill_queue();

        let mut builder = GenerationConfigBuilder::new()
            .control_template(self.read_text(&self.templates.control)?)
            .decimals(std::mem::take(&mut self.decimals));

        if let Some(submit) = &self.templates.submit {
            builder = builder.submit_template(self.read_text(submit)?);
        }

        for path in &self.templates.copy {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .ok_or_else(|| {
                    CliError::Config(format!("Cannot copy '{}': not a file.", path.display()))
                })?;
            builder = builder.extra_file(name, self.read_text(path)?);
        }

        Ok(builder.variables(self.parameters).build()?)
    }
}
