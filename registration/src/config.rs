//! Form settings loaded via OrthoConfig.
//!
//! Values come from `REGISTRATION_FORM_*` environment variables and any
//! configuration file OrthoConfig discovers. Every field is optional; the
//! accessors supply the defaults.

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{AgePolicy, DEFAULT_NOTIFICATION_DURATION};

const DEFAULT_STORE_DIR: &str = ".registration-form";

/// Configuration for the registration form binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "REGISTRATION_FORM")]
pub struct FormSettings {
    /// Directory holding the stored record.
    pub store_dir: Option<PathBuf>,
    /// Youngest accepted applicant age in years.
    pub minimum_age: Option<u32>,
    /// Oldest accepted applicant age in years.
    pub maximum_age: Option<u32>,
    /// Success notification lifetime in milliseconds.
    pub notification_duration_ms: Option<u64>,
}

impl FormSettings {
    /// Return the configured store directory, falling back to the default.
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.store_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR))
    }

    /// Build the age policy from configured bounds.
    #[must_use]
    pub fn age_policy(&self) -> AgePolicy {
        AgePolicy {
            minimum_years: self
                .minimum_age
                .unwrap_or(AgePolicy::DEFAULT_MINIMUM_YEARS),
            maximum_years: self
                .maximum_age
                .unwrap_or(AgePolicy::DEFAULT_MAXIMUM_YEARS),
        }
    }

    /// Return the notification lifetime, falling back to the default.
    #[must_use]
    pub fn notification_duration(&self) -> Duration {
        self.notification_duration_ms
            .map_or(DEFAULT_NOTIFICATION_DURATION, Duration::from_millis)
    }
}
