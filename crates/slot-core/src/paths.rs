use crate::error::{Result, SlotError};
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Store location
// ---------------------------------------------------------------------------

/// Store file location relative to the user's home directory.
pub const DEFAULT_STORE_FILE: &str = ".config/slot/slots.yaml";

/// Environment variable that overrides the store file location.
/// Read by the CLI layer only; the core receives the resolved path.
pub const STORE_FILE_ENV: &str = "SLOT_FILE";

/// Resolve the store file.
///
/// Priority:
/// 1. `explicit` (the `--file` flag or `SLOT_FILE`), with `~` and `$VAR`
///    expanded
/// 2. `$HOME/.config/slot/slots.yaml`
pub fn resolve_store_file(explicit: Option<&str>) -> Result<PathBuf> {
    match explicit {
        Some(raw) if !raw.trim().is_empty() => {
            let path = expand(raw)?;
            tracing::debug!(path = %path.display(), "using explicit store file");
            Ok(path)
        }
        _ => {
            let home = home::home_dir().ok_or(SlotError::HomeNotFound)?;
            let path = default_store_file(&home);
            tracing::debug!(path = %path.display(), "using default store file");
            Ok(path)
        }
    }
}

pub fn default_store_file(home: &Path) -> PathBuf {
    home.join(DEFAULT_STORE_FILE)
}

fn expand(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw).map_err(|e| SlotError::InvalidPath {
        path: raw.to_string(),
        reason: e.to_string(),
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

/// Render a path with forward slashes, as exposed to templates.
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
