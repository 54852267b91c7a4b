pub mod collection;
pub mod error;
pub mod io;
pub mod listing;
pub mod paths;
pub mod render;
pub mod slot;
pub mod store;

pub use collection::Slots;
pub use error::{Result, SlotError};
pub use slot::Slot;
pub use store::Store;
