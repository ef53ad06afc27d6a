// Adapters layer: concrete Store implementations.

pub mod file_store;
pub mod memory;
pub mod state;

pub use file_store::FileStore;
pub use memory::MemoryStore;
pub use state::StoreState;
