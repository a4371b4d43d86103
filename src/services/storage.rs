use crate::domain::errors::CheckError;
use crate::domain::models::PersistedState;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What the previous run left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousState {
    /// First run, or the record was unreadable/corrupt.
    NoHistory,
    Known(PersistedState),
}

impl PreviousState {
    pub fn found(&self) -> Option<bool> {
        match self {
            PreviousState::NoHistory => None,
            PreviousState::Known(s) => Some(s.found),
        }
    }
}

pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Never fails: a missing or corrupt record degrades to `NoHistory`.
    pub fn load(&self) -> PreviousState {
        if !self.path.exists() {
            return PreviousState::NoHistory;
        }
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state unreadable, treating as no history"
                );
                return PreviousState::NoHistory;
            }
        };
        match serde_json::from_str::<PersistedState>(&raw) {
            Ok(state) => PreviousState::Known(state),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state corrupt, treating as no history"
                );
                PreviousState::NoHistory
            }
        }
    }

    pub fn save(&self, state: &PersistedState) -> Result<(), CheckError> {
        let body = serde_json::to_string_pretty(state).map_err(|e| self.error(e))?;
        atomic_write(&self.path, format!("{body}\n").as_bytes()).map_err(|e| self.error(e))
    }

    fn error(&self, e: impl std::fmt::Display) -> CheckError {
        CheckError::State {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

/// Marker polled by the external automation: present iff the last run changed state.
pub struct FlagArtifact {
    path: PathBuf,
}

impl FlagArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn raise(&self, note: &str) -> Result<(), CheckError> {
        if let Some(parent) = non_empty_parent(&self.path) {
            std::fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        std::fs::write(&self.path, format!("{note}\n")).map_err(|e| self.error(e))
    }

    /// Returns whether a flag was actually removed.
    pub fn clear(&self) -> Result<bool, CheckError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(self.error(e)),
        }
    }

    fn error(&self, e: impl std::fmt::Display) -> CheckError {
        CheckError::State {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

/// Write to a sibling temp file, fsync, then rename over the target.
fn atomic_write(target: &Path, content: &[u8]) -> std::io::Result<()> {
    let parent = non_empty_parent(target).unwrap_or(Path::new("."));
    std::fs::create_dir_all(parent)?;

    let file_name = target
        .file_name()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))?;
    let temp_path = parent.join(format!(
        ".{}.tmp.{}",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    {
        let mut f = std::fs::File::create(&temp_path)?;
        f.write_all(content)?;
        f.sync_all()?;
    }
    if let Err(e) = std::fs::rename(&temp_path, target) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e);
    }
    Ok(())
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
