//! Repository adapters
pub mod memory;
pub mod sled_store;

pub use memory::MemoryRepository;
pub use sled_store::SledRepository;
