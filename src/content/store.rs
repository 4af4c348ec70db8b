use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::info;

use super::ContentStore;

/// File name of the store inside the output directory.
pub const STORE_FILE: &str = "content.json";

/// The content store cannot be served: no candidate file, or an unreadable one.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no content store at {} or {}", primary.display(), fallback.display())]
    Missing { primary: PathBuf, fallback: PathBuf },
    #[error("failed to read content store {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse content store {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Pick the primary path when it exists, the fallback otherwise.
pub fn resolve_path(primary: &Path, fallback: &Path) -> Result<PathBuf, StoreError> {
    if primary.exists() {
        Ok(primary.to_path_buf())
    } else if fallback.exists() {
        Ok(fallback.to_path_buf())
    } else {
        Err(StoreError::Missing {
            primary: primary.to_path_buf(),
            fallback: fallback.to_path_buf(),
        })
    }
}

pub fn read_store(path: &Path) -> Result<ContentStore, StoreError> {
    let raw = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the store as pretty-printed JSON into `out_dir`, creating it if needed.
pub fn write_store(store: &ContentStore, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let out_file = out_dir.join(STORE_FILE);
    let json = serde_json::to_string_pretty(store)?;
    std::fs::write(&out_file, json)
        .with_context(|| format!("Failed to write {}", out_file.display()))?;
    info!("Wrote content store: {}", out_file.display());
    Ok(out_file)
}
