use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tempfile::NamedTempFile;
use tracing::debug;

use super::error::{MetricsError, MetricsResult};
use super::types::{MetricsHistory, SampleSet};

/// Append-only metrics history persisted as one JSON document.
///
/// Appends are serialized by an internal lock held for the whole load-modify-store cycle.
/// Writes go to a temp file in the same directory and are renamed over the target, so a
/// concurrent [`load`](Self::load) sees either the old or the new document.
#[derive(Debug)]
pub struct MetricsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl MetricsStore {
    /// Opens the store at `path`. Nothing is created until the first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the history file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full history. A missing file is an empty history.
    pub fn load(&self) -> MetricsResult<MetricsHistory> {
        let raw = match std::fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(MetricsHistory::default());
            }
            Err(source) => {
                return Err(MetricsError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&raw).map_err(|source| MetricsError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Appends one call's six samples.
    ///
    /// A corrupt history file is left untouched and the append fails.
    pub fn append(&self, samples: &SampleSet) -> MetricsResult<()> {
        let _guard = self.write_lock.lock();

        let mut history = self.load()?;
        history.push(samples);
        self.write(&history)?;

        debug!(
            label = %samples.label,
            timestamp = samples.timestamp,
            total = history.len(),
            "Metrics appended"
        );
        Ok(())
    }

    fn write(&self, history: &MetricsHistory) -> MetricsResult<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |source: std::io::Error| MetricsError::Io {
            path: dir.clone(),
            source,
        };

        std::fs::create_dir_all(&dir).map_err(io_err)?;

        let tmp = NamedTempFile::new_in(&dir).map_err(io_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer(&mut writer, history)?;
            writer.flush().map_err(io_err)?;
        }

        tmp.persist(&self.path)
            .map_err(|e| MetricsError::Persist {
                path: self.path.clone(),
                source: e.error,
            })?;
        Ok(())
    }
}
