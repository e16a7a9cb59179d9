//! JSON table files with atomic replace-on-write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

const TEMP_FILE_SUFFIX: &str = ".tmp";

/// Errors from writing a table to disk.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load a table from disk.
///
/// Missing or unparsable files yield an empty (default) table.
pub fn load_table<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} does not exist, starting empty", path.display());
            return T::default();
        }
        Err(e) => {
            warn!("Could not read {}: {}, starting empty", path.display(), e);
            return T::default();
        }
    };

    match serde_json::from_slice(&raw) {
        Ok(table) => table,
        Err(e) => {
            warn!("Could not parse {}: {}, starting empty", path.display(), e);
            T::default()
        }
    }
}

/// Write a table to a sibling temp file, then rename it over `path`.
pub fn save_table<T>(path: &Path, table: &T) -> Result<(), StoreError>
where
    T: Serialize,
{
    let bytes = serde_json::to_vec_pretty(table).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = temp_path(path);
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&tmp, bytes).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;

    debug!("Saved {}", path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TEMP_FILE_SUFFIX);
    PathBuf::from(name)
}
