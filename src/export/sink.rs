//! Artifact persistence.

use crate::error::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Upper bound on numbered file name candidates.
const MAX_NUMBERED_ATTEMPTS: u32 = 10_000;

/// Trait for destinations that accept a finished artifact.
pub trait ArtifactSink: Send + Sync {
    /// Store `bytes` under `file_name` and return where they went.
    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// What to do when the target file already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Replace the existing file
    #[default]
    Overwrite,
    /// Pick the first free `name (N).ext`
    Numbered,
}

/// Writes artifacts into a directory.
///
/// Bytes go to a temporary file next to the target which is then renamed
/// into place, so readers never observe a half-written report.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
    policy: CollisionPolicy,
}

impl FileSink {
    /// Create a sink for `dir` that overwrites existing files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            policy: CollisionPolicy::default(),
        }
    }

    /// Set the collision policy.
    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get the target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the path a file named `file_name` would be written to.
    pub fn resolve_path(&self, file_name: &str) -> Result<PathBuf> {
        let direct = self.dir.join(file_name);
        if self.policy == CollisionPolicy::Overwrite || !direct.exists() {
            return Ok(direct);
        }

        let name = Path::new(file_name);
        let stem = name
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = name.extension().map(|e| e.to_string_lossy().into_owned());

        for n in 1..=MAX_NUMBERED_ATTEMPTS {
            let candidate = match ext {
                Some(ref ext) => format!("{} ({}).{}", stem, n, ext),
                None => format!("{} ({})", stem, n),
            };
            let path = self.dir.join(candidate);
            if !path.exists() {
                return Ok(path);
            }
        }

        Err(Error::Other(format!(
            "No free file name for {} in {}",
            file_name,
            self.dir.display()
        )))
    }
}

impl ArtifactSink for FileSink {
    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let target = self.resolve_path(file_name)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        match self.policy {
            CollisionPolicy::Overwrite => {
                tmp.persist(&target)?;
            }
            CollisionPolicy::Numbered => {
                tmp.persist_noclobber(&target)?;
            }
        }

        log::info!("Saved {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    artifacts: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all stored artifacts, oldest first.
    pub fn take(&self) -> Vec<(String, Vec<u8>)> {
        match self.artifacts.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Number of stored artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.lock().map(|a| a.len()).unwrap_or(0)
    }

    /// Check if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ArtifactSink for MemorySink {
    fn persist(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let mut artifacts = self
            .artifacts
            .lock()
            .map_err(|_| Error::Io(io::Error::new(io::ErrorKind::Other, "sink lock poisoned")))?;
        artifacts.push((file_name.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(file_name))
    }
}
