use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::LeaveError;
use crate::model::leave_store::Store;

/// The whole leave document, kept as one JSON file.
///
/// Every load reads the full file and every save rewrites it; a crash in the
/// middle of a write can leave a truncated file behind.
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the document; a missing file is an empty store.
    pub fn load_store(&self) -> Result<Store, LeaveError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "data file absent, starting empty");
                return Ok(Store::default());
            }
            Err(e) => return Err(LeaveError::Io(e)),
        };

        let mut store: Store = serde_json::from_slice(&bytes).map_err(LeaveError::CorruptState)?;
        store.dedup_blocked();
        Ok(store)
    }

    /// Overwrites the document with `store`.
    pub fn save_store(&self, store: &Store) -> Result<(), LeaveError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_vec_pretty(store).map_err(io::Error::from)?;
        fs::write(&self.path, json)?;

        debug!(
            path = %self.path.display(),
            requests = store.requests.len(),
            blocked = store.blocked.len(),
            "data file written"
        );
        Ok(())
    }
}
