mod memory;
mod provider;

pub use memory::{MemoryBoardRegistry, MemoryBoardRegistryError};
pub use provider::{BoardRegistry, RegistryError, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
