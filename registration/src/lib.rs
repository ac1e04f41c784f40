//! Registration form library: field validators, the form controller, and
//! the storage and notification adapters it is wired to.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::FormSettings;
