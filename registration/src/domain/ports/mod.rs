//! Domain ports defining the edges of the hexagon.
//!
//! The form controller reaches storage and the notification surface only
//! through these traits, so adapters (a directory of JSON files, an
//! in-memory map, a terminal) can be swapped without touching the domain.

mod key_value_store;
mod macros;
mod notifier;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use key_value_store::MockKeyValueStore;
pub use key_value_store::{KeyValueStore, KeyValueStoreError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::Notifier;
