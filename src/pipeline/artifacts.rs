//! Ephemeral storage for generated reports, QR images and audio.
//!
//! Files are persisted under a single directory with random names and are
//! never removed by the pipeline; lifetime belongs to whoever serves or
//! downloads them.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory that holds generated artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Use `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create a new uniquely named file that survives drop.
    pub fn create(&self, prefix: &str, suffix: &str) -> std::io::Result<(File, PathBuf)> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(&self.dir)?;
        Ok(file.keep()?)
    }

    /// Write `bytes` to a new artifact and return its path.
    pub fn write(&self, prefix: &str, suffix: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        let (mut file, path) = self.create(prefix, suffix)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(path)
    }

    /// Path under which `path` is served over HTTP (`/artifacts/<name>`).
    /// `None` for paths outside this store.
    pub fn public_url(&self, path: &Path) -> Option<String> {
        if path.parent()? != self.dir.as_path() {
            return None;
        }
        let name = path.file_name()?.to_str()?;
        Some(format!("/artifacts/{name}"))
    }
}
