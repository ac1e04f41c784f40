//! Port for the string key-value store backing submitted records.
//!
//! The contract mirrors browser local storage: values are opaque strings,
//! `set` overwrites whatever was stored under the key, and there is no
//! history or transaction support.

use super::define_port_error;

define_port_error! {
    /// Errors raised by key-value store adapters.
    pub enum KeyValueStoreError {
        /// The backing store cannot be reached at all.
        Unavailable {
            /// Adapter-specific detail.
            message: String,
        } => "key-value store unavailable: {message}",
        /// The key cannot be represented by the adapter.
        InvalidKey {
            /// Offending key.
            key: String,
        } => "invalid storage key: {key:?}",
        /// Reading a value failed.
        Read {
            /// Key being read.
            key: String,
            /// Adapter-specific detail.
            message: String,
        } => "failed to read {key}: {message}",
        /// Writing a value failed.
        Write {
            /// Key being written.
            key: String,
            /// Adapter-specific detail.
            message: String,
        } => "failed to write {key}: {message}",
    }
}

/// Synchronous single-writer key-value store.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError>;
}
