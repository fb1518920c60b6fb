use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::foundation::error::{KeepsakeError, KeepsakeResult};

/// A saved export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    /// Where the file ended up.
    pub path: PathBuf,
    /// Temporary handle to release once the save has settled.
    pub staging: Option<PathBuf>,
}

/// Destination for encoded exports.
pub trait DownloadSink: Send + Sync + 'static {
    /// Persist `bytes` as `filename`.
    fn save(&self, filename: &str, bytes: &[u8]) -> KeepsakeResult<Download>;

    /// Drop a staging handle returned by [`DownloadSink::save`].
    fn release(&self, staging: &Path) -> KeepsakeResult<()>;
}

/// Writes exports into a directory through a staging file.
#[derive(Clone, Debug)]
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirSink {
    fn save(&self, filename: &str, bytes: &[u8]) -> KeepsakeResult<Download> {
        std::fs::create_dir_all(&self.dir)?;
        let staging = self.dir.join(format!(".{filename}.part"));
        let path = self.dir.join(filename);
        std::fs::write(&staging, bytes)?;
        std::fs::copy(&staging, &path)?;
        Ok(Download {
            path,
            staging: Some(staging),
        })
    }

    fn release(&self, staging: &Path) -> KeepsakeResult<()> {
        match std::fs::remove_file(staging) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    saved: Mutex<Vec<(String, Vec<u8>)>>,
    released: Mutex<Vec<PathBuf>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saved `(filename, bytes)` pairs in order.
    pub fn saved(&self) -> Vec<(String, Vec<u8>)> {
        self.saved.lock().map(|v| v.clone()).unwrap_or_default()
    }

    /// Staging handles released so far.
    pub fn released(&self) -> Vec<PathBuf> {
        self.released.lock().map(|v| v.clone()).unwrap_or_default()
    }
}

impl DownloadSink for InMemorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> KeepsakeResult<Download> {
        self.saved
            .lock()
            .map_err(|_| KeepsakeError::render("in-memory sink poisoned"))?
            .push((filename.to_owned(), bytes.to_vec()));
        Ok(Download {
            path: PathBuf::from(filename),
            staging: Some(PathBuf::from(format!("mem://{filename}"))),
        })
    }

    fn release(&self, staging: &Path) -> KeepsakeResult<()> {
        self.released
            .lock()
            .map_err(|_| KeepsakeError::render("in-memory sink poisoned"))?
            .push(staging.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
