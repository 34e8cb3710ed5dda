use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Destination for the named text artifacts produced by a workflow.
///
/// Workflows only hand artifacts to a sink after every validation step has passed,
/// so a failed run never leaves partial output behind.
pub trait ArtifactSink {
    /// Stores `contents` under `name`, replacing any previous artifact of that name.
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()>;
}

/// Writes artifacts as files inside one directory, created on first write.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactSink for DirectorySink {
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        debug!("Writing artifact {:?}", &path);
        let mut file = fs::File::create(&path)?;
        file.write_all(contents.as_bytes())?;
        file.flush()
    }
}

/// Keeps artifacts in memory; used for dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: BTreeMap<String, String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn write_artifact(&mut self, name: &str, contents: &str) -> io::Result<()> {
        self.artifacts.insert(name.to_string(), contents.to_string());
        Ok(())
    }
}
