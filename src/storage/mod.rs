//! Persistent key-value storage for the session token

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Key-value store holding the session token.
///
/// The session manager is the only writer of the session key. Readers such
/// as the HTTP transport go through the manager rather than the store.
pub trait TokenStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
