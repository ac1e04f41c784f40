//! Test utilities for the registration form crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled only for tests or with the `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, Utc};
use mockable::Clock;
use tempfile::TempDir;

use crate::domain::Notification;
use crate::domain::ports::{KeyValueStore, KeyValueStoreError, Notifier};
use crate::outbound::storage::FileKeyValueStore;

fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(_) => panic!("{what} mutex poisoned"),
    }
}

/// Clock pinned to a settable instant.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *lock(&self.0, "clock") = now;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0, "clock")
    }
}

/// Notifier that remembers every notification it receives.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<Notification>>);

impl RecordingNotifier {
    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.0, "notifier").clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        lock(&self.0, "notifier").push(notification.clone());
    }
}

/// Store whose writes always fail, as when storage quota is exhausted.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingKeyValueStore;

impl KeyValueStore for FailingKeyValueStore {
    fn get(&self, _key: &str) -> Result<Option<String>, KeyValueStoreError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), KeyValueStoreError> {
        Err(KeyValueStoreError::write(key, "quota exceeded"))
    }
}

/// Open a [`FileKeyValueStore`] in a fresh temporary directory.
///
/// Keep the returned [`TempDir`] alive for as long as the store is used.
///
/// # Panics
/// Panics when the temporary directory or store cannot be created.
pub fn temp_file_store() -> (TempDir, FileKeyValueStore) {
    let temp = match TempDir::new() {
        Ok(temp) => temp,
        Err(error) => panic!("create temp dir: {error}"),
    };
    let store = match FileKeyValueStore::open(temp.path()) {
        Ok(store) => store,
        Err(error) => panic!("open file store: {error}"),
    };
    (temp, store)
}
