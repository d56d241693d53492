//! Crash-safe JSON snapshots on local disk
//!
//! Snapshots are written to a sibling temp file, synced, then renamed over the
//! target so readers only ever see the previous or the new complete file.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to {action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to parse '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a JSON snapshot, returning the default value when the file is missing or empty.
pub fn read_json<T>(path: &Path) -> Result<T, PersistError>
where
    T: DeserializeOwned + Default,
{
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(PersistError::io("read", path, e)),
    };

    if bytes.iter().all(|b| b.is_ascii_whitespace()) {
        return Ok(T::default());
    }

    serde_json::from_slice(&bytes).map_err(|source| PersistError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Atomically replace `path` with the pretty-printed JSON form of `value`.
pub fn write_json_atomic<T>(path: &Path, value: &T) -> Result<(), PersistError>
where
    T: Serialize + ?Sized,
{
    let mut json = serde_json::to_vec_pretty(value).map_err(PersistError::Serialize)?;
    json.push(b'\n');

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .map_err(|e| PersistError::io("create directory", parent, e))?;
            parent.to_path_buf()
        }
        _ => PathBuf::from("."),
    };

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "snapshot".to_string());
    let tmp_path = dir.join(format!(".{file_name}.{}.tmp", Uuid::new_v4().simple()));

    let result = write_and_sync(&tmp_path, &json).and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| PersistError::io("rename snapshot onto", path, e))
    });

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Failed to remove temp snapshot {}: {e}", tmp_path.display());
            }
        }
    }

    result
}

fn write_and_sync(tmp_path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let mut file =
        File::create(tmp_path).map_err(|e| PersistError::io("create temp file", tmp_path, e))?;
    file.write_all(bytes)
        .map_err(|e| PersistError::io("write temp file", tmp_path, e))?;
    file.sync_all()
        .map_err(|e| PersistError::io("sync temp file", tmp_path, e))
}
