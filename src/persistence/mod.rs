pub mod files;
pub mod kv;
pub mod snapshot;

pub use files::{get_data_dir, init_local_data_dir};
pub use kv::{FileStore, KeyValueStore};
pub use snapshot::{load_state, save_state, Changes, SavedState};

#[cfg(test)]
pub use kv::MemoryStore;
