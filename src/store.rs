use crate::controller::ExclusionStore;
use crate::warning;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// on-disk shape: exclusion lists for every workspace, keyed by the
/// repository root so separate checkouts do not collide
#[derive(Debug, Default, Serialize, Deserialize)]
struct ExclusionFile {
    workspaces: BTreeMap<String, Vec<String>>,
}

/// exclusion set persisted as JSON in the user config directory; reads
/// go back to disk every time so each status cycle sees the latest state
pub struct JsonExclusionStore {
    file_path: PathBuf,
    workspace: String,
}

impl JsonExclusionStore {
    pub fn open(workspace_root: &Path) -> Result<Self> {
        let config_dir = dirs::config_dir().context("failed to locate the user config directory")?;
        let file_path = config_dir.join("git-status-picker").join("exclusions.json");
        Self::open_at(&file_path, workspace_root)
    }

    fn open_at(file_path: &Path, workspace_root: &Path) -> Result<Self> {
        let store = Self {
            file_path: file_path.to_path_buf(),
            workspace: workspace_root.to_string_lossy().into_owned(),
        };
        // fail fast on a corrupt file rather than silently overwriting it
        store.load()?;
        Ok(store)
    }

    fn load(&self) -> Result<ExclusionFile> {
        match fs::read_to_string(&self.file_path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("malformed exclusion file: {}", self.file_path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(ExclusionFile::default()),
            Err(e) => Err(e)
                .with_context(|| format!("failed to read {}", self.file_path.display())),
        }
    }

    fn save(&self, file: &ExclusionFile) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(file).context("failed to serialise exclusions")?;
        fs::write(&self.file_path, json)
            .with_context(|| format!("failed to write {}", self.file_path.display()))?;
        Ok(())
    }

    fn update(&self, mutate: impl FnOnce(&mut Vec<String>)) -> Result<()> {
        let mut file = self.load()?;
        let mut excluded = file.workspaces.remove(&self.workspace).unwrap_or_default();
        mutate(&mut excluded);
        if !excluded.is_empty() {
            file.workspaces.insert(self.workspace.clone(), excluded);
        }
        self.save(&file)
    }
}

impl ExclusionStore for JsonExclusionStore {
    fn list(&self) -> Vec<String> {
        match self.load() {
            Ok(mut file) => file.workspaces.remove(&self.workspace).unwrap_or_default(),
            // a silent empty set here would re-activate every exclusion
            Err(e) => {
                warning!("ignoring exclusions: {:#}", e);
                Vec::new()
            }
        }
    }

    fn exclude(&mut self, path: &str) -> Result<()> {
        self.update(|excluded| {
            if !excluded.iter().any(|p| p == path) {
                excluded.push(path.to_string());
                excluded.sort();
            }
        })
    }

    fn include(&mut self, path: &str) -> Result<()> {
        self.update(|excluded| excluded.retain(|p| p != path))
    }
}
