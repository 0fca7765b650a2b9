//! Device-local key-value stores
//!
//! Both implement `LocalDeviceStore`; the favorites array is one value under a
//! fixed key.

pub mod file;
pub mod memory;

pub use file::FileLocalStore;
pub use memory::MemoryLocalStore;
