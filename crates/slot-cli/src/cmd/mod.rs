pub mod init;
pub mod list;
pub mod path;
pub mod remove;
pub mod render;
pub mod save;
pub mod show;

use anyhow::Context;
use slot_core::{paths, SlotError, Slots, Store};

/// Resolve the store file and open it.
pub fn open_store(explicit: Option<&str>) -> anyhow::Result<Store> {
    let path = paths::resolve_store_file(explicit)?;
    Store::open(&path).with_context(|| format!("cannot open store at {}", path.display()))
}

pub fn load(store: &Store) -> anyhow::Result<Slots> {
    store
        .load()
        .with_context(|| format!("failed to load {}", store.path().display()))
}

pub fn save(store: &Store, slots: &Slots) -> anyhow::Result<()> {
    store
        .save(slots)
        .with_context(|| format!("failed to save {}", store.path().display()))
}

/// Not-found error carrying the closest stored name as a hint.
pub fn not_found(slots: &Slots, name: &str) -> SlotError {
    SlotError::NotFound {
        name: name.to_string(),
        suggestion: slots.closest(name).map(str::to_string),
    }
}
