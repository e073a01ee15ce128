///! Persisted "already caught" state.

mod storage;
mod store;

pub use storage::{CaughtStorage, FileStorage, MemoryStorage};
pub use store::{CaughtSet, CaughtStore};
