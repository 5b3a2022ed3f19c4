use crate::canvas::Canvas;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("canvas {name} not found in {}", dir.display())]
    NotFound { name: String, dir: PathBuf },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A canvas together with the location it was loaded from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredCanvas {
    pub path: PathBuf,
    pub canvas: Canvas,
}

pub trait CanvasStore {
    fn load_canvas(&self, name: &str) -> Result<StoredCanvas, StoreError>;
    fn save_canvas(&self, stored: &StoredCanvas) -> Result<(), StoreError>;
}

/// Canvas files kept in one directory.
///
/// Names resolve to `dir/name` when that file exists, otherwise to the first
/// file (by name) in `dir` whose name ends with `name`, so `notes.canvas`
/// finds `2024-05-01-notes.canvas`.
#[derive(Debug, Clone)]
pub struct FileCanvasStore {
    dir: PathBuf,
}

impl FileCanvasStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Opens `dir`, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn resolve(&self, name: &str) -> Result<PathBuf, StoreError> {
        let exact = self.dir.join(name);
        if exact.is_file() {
            return Ok(exact);
        }

        let not_found = || StoreError::NotFound {
            name: name.to_string(),
            dir: self.dir.clone(),
        };
        let entries = fs::read_dir(&self.dir).map_err(|_| not_found())?;
        let mut candidates: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .and_then(|file| file.to_str())
                    .is_some_and(|file| file.ends_with(name))
            })
            .collect();
        candidates.sort();
        let found = candidates.into_iter().next().ok_or_else(not_found)?;
        debug!(name = name, path:? = found; "resolved canvas by suffix");
        Ok(found)
    }
}

impl CanvasStore for FileCanvasStore {
    fn load_canvas(&self, name: &str) -> Result<StoredCanvas, StoreError> {
        let path = self.resolve(name)?;
        let contents = fs::read_to_string(&path).map_err(|source| StoreError::Read {
            path: path.clone(),
            source,
        })?;
        let canvas: Canvas = serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        info!(
            path:? = path,
            nodes = canvas.nodes.len(),
            edges = canvas.edges.len();
            "loaded canvas"
        );
        Ok(StoredCanvas { path, canvas })
    }

    /// Writes pretty JSON next to the target and renames it into place.
    fn save_canvas(&self, stored: &StoredCanvas) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            path: stored.path.clone(),
            source,
        };
        let json = serde_json::to_string_pretty(&stored.canvas)
            .map_err(|err| write_error(std::io::Error::other(err)))?;

        let mut staging = stored.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        fs::write(&staging, json).map_err(write_error)?;
        if let Err(source) = fs::rename(&staging, &stored.path) {
            let _ = fs::remove_file(&staging);
            return Err(write_error(source));
        }
        info!(path:? = stored.path; "saved canvas");
        Ok(())
    }
}
