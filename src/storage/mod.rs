//! Storage for users, credentials, roles and permissions

pub mod memory;
pub mod traits;

pub use memory::MemoryUserDirectory;
pub use traits::{UserDirectory, UserRegistry};
