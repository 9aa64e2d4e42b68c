//! Published chart artifacts and the "latest" pointer.
//!
//! Files are written next to each other in one directory and never removed. The
//! index lives in memory only, so a restarted process starts without a latest chart.
use crate::error::{AnalysisError, ComputeError, NotFoundError};
use chrono::Local;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// One published chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Artifact {
    pub run_id: String,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
struct StoreState {
    runs: HashMap<String, Artifact>,
    latest: Option<Artifact>,
}

#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    sequence: AtomicU64,
    state: Mutex<StoreState>,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sequence: AtomicU64::new(0),
            state: Mutex::new(StoreState::default()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `bytes` as `failures_<run_id>.<extension>` and makes it the latest
    /// artifact. The file is complete on disk before the pointer moves.
    pub fn publish(&self, bytes: &[u8], extension: &str) -> Result<Artifact, ComputeError> {
        let run_id = self.next_run_id();
        let path = self.dir.join(format!("failures_{run_id}.{extension}"));
        let tmp_path = self.dir.join(format!(".failures_{run_id}.{extension}.tmp"));

        fs::create_dir_all(&self.dir).map_err(|source| write_error(&self.dir, source))?;
        fs::write(&tmp_path, bytes).map_err(|source| write_error(&tmp_path, source))?;
        fs::rename(&tmp_path, &path).map_err(|source| write_error(&path, source))?;

        let artifact = Artifact { run_id, path };
        let mut state = self.lock();
        state.runs.insert(artifact.run_id.clone(), artifact.clone());
        state.latest = Some(artifact.clone());
        drop(state);

        info!("Published chart {} ({} bytes)", artifact.path.display(), bytes.len());
        Ok(artifact)
    }

    pub fn latest(&self) -> Result<Artifact, NotFoundError> {
        self.lock().latest.clone().ok_or(NotFoundError::NoArtifact)
    }

    pub fn get(&self, run_id: &str) -> Result<Artifact, NotFoundError> {
        self.lock()
            .runs
            .get(run_id)
            .cloned()
            .ok_or_else(|| NotFoundError::UnknownRun(run_id.to_string()))
    }

    /// Contents of the latest artifact.
    pub fn read_latest(&self) -> Result<Vec<u8>, AnalysisError> {
        let artifact = self.latest()?;
        let bytes = fs::read(&artifact.path).map_err(|source| ComputeError::Artifact {
            path: artifact.path.display().to_string(),
            source,
        })?;
        Ok(bytes)
    }

    fn next_run_id(&self) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}_{:04}", Local::now().format("%Y%m%d_%H%M%S_%6f"), sequence)
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn write_error(path: &Path, source: std::io::Error) -> ComputeError {
    ComputeError::Artifact { path: path.display().to_string(), source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn nothing_published_yet() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(matches!(store.latest(), Err(NotFoundError::NoArtifact)));
        assert!(matches!(store.read_latest(), Err(AnalysisError::NotFound(NotFoundError::NoArtifact))));
        assert!(matches!(store.get("nope"), Err(NotFoundError::UnknownRun(_))));
    }

    #[test]
    fn latest_moves_and_old_runs_stay() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("charts"));
        let first = store.publish(b"<svg>first</svg>", "svg").unwrap();
        let second = store.publish(b"<svg>second</svg>", "svg").unwrap();

        assert_ne!(first.run_id, second.run_id);
        assert_ne!(first.path, second.path);
        assert_eq!(store.latest().unwrap(), second);
        assert_eq!(store.read_latest().unwrap(), b"<svg>second</svg>");
        assert_eq!(store.get(&first.run_id).unwrap(), first);
        assert_eq!(fs::read(&first.path).unwrap(), b"<svg>first</svg>");

        let name = second.path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("failures_") && name.ends_with(".svg"), "{name}");
        let leftovers = fs::read_dir(store.dir())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn concurrent_publishes_get_unique_names() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(ArtifactStore::new(dir.path()));
        let handles: Vec<_> = (0..8)
            .map(|index| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.publish(format!("chart {index}").as_bytes(), "svg").unwrap())
            })
            .collect();
        let artifacts: Vec<Artifact> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();

        let mut paths: Vec<&PathBuf> = artifacts.iter().map(|artifact| &artifact.path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 8);
        assert!(artifacts.contains(&store.latest().unwrap()));
    }

    #[test]
    fn unwritable_directory_is_a_compute_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();
        let store = ArtifactStore::new(blocker.join("charts"));
        assert!(matches!(store.publish(b"<svg/>", "svg"), Err(ComputeError::Artifact { .. })));
        assert!(store.latest().is_err());
    }
}
