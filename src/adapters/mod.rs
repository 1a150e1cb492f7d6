// Adapters layer: concrete implementations of the domain ports.

pub mod file_store;
pub mod identity;
pub mod memory_store;
pub mod table;

pub use file_store::FileCardStore;
pub use identity::HttpIdentityVerifier;
pub use memory_store::InMemoryCardStore;
