// Adapters layer: concrete stores and file storage.

pub mod local;
pub mod memory;
pub mod sqlite;

pub use local::LocalStorage;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
