//! The on-disk slot store: one YAML file holding the full collection,
//! read whole on load and rewritten whole on save.

use crate::collection::Slots;
use crate::error::Result;
use crate::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    /// Open the store at an already-resolved path, creating its parent
    /// directory. The file itself is created on the first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            io::ensure_dir(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. A missing or blank file is an empty store.
    pub fn load(&self) -> Result<Slots> {
        let Some(data) = io::read_if_exists(&self.path)? else {
            tracing::debug!(path = %self.path.display(), "store file missing, starting empty");
            return Ok(Slots::new());
        };
        let slots = decode(&data)?;
        tracing::debug!(path = %self.path.display(), count = slots.len(), "loaded slots");
        Ok(slots)
    }

    /// Serialize the whole collection and atomically replace the file.
    pub fn save(&self, slots: &Slots) -> Result<()> {
        let data = encode(slots)?;
        io::atomic_write(&self.path, data.as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = slots.len(), "saved slots");
        Ok(())
    }
}

/// Parse store file contents.
pub fn decode(data: &str) -> Result<Slots> {
    if data.trim().is_empty() {
        return Ok(Slots::new());
    }
    Ok(serde_yaml::from_str(data)?)
}

/// Render store file contents. Multi-line commands come out as literal
/// blocks, so the file stays hand-editable.
pub fn encode(slots: &Slots) -> Result<String> {
    if slots.is_empty() {
        return Ok(String::new());
    }
    Ok(serde_yaml::to_string(slots)?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
