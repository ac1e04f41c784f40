//! Form field identifiers and the per-field state record.
//!
//! Every field carries its value, its current error message and whether it
//! has been touched in a single [`FieldState`], so the three facets can never
//! disagree about which fields exist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the six attributes captured by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldId {
    /// Given name.
    FirstName,
    /// Family name.
    LastName,
    /// Contact email address.
    Email,
    /// Birth date in `YYYY-MM-DD` form.
    BirthDate,
    /// Five digit postal code.
    PostalCode,
    /// City of residence.
    City,
}

impl FieldId {
    /// All fields in the order the form presents them.
    pub const ALL: [Self; 6] = [
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::BirthDate,
        Self::PostalCode,
        Self::City,
    ];

    /// Stable camelCase key used in storage and element identifiers.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::BirthDate => "birthDate",
            Self::PostalCode => "postalCode",
            Self::City => "city",
        }
    }

    /// Human readable label shown next to the input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::BirthDate => "Birth date",
            Self::PostalCode => "Postal code",
            Self::City => "City",
        }
    }

    /// Identifier of the element that renders this field's error.
    ///
    /// # Examples
    /// ```
    /// use registration_form::domain::FieldId;
    ///
    /// assert_eq!(FieldId::PostalCode.error_element_id(), "postalCode-error");
    /// ```
    #[must_use]
    pub fn error_element_id(self) -> String {
        format!("{}-error", self.key())
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Returned when a string does not name a known field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field: {key}")]
pub struct UnknownFieldError {
    /// The unrecognised key.
    pub key: String,
}

impl FromStr for FieldId {
    type Err = UnknownFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| UnknownFieldError { key: s.to_owned() })
    }
}

/// Value, error and touched flag for a single field.
///
/// ## Invariants
/// - `touched` only ever moves from `false` to `true`; the controller resets
///   it by replacing the whole record.
/// - An empty `error` means the last validation passed (or none ran yet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldState {
    pub(crate) value: String,
    pub(crate) error: String,
    pub(crate) touched: bool,
}

impl FieldState {
    /// Record used for fields the form has not seen yet.
    pub(crate) const UNTOUCHED: Self = Self {
        value: String::new(),
        error: String::new(),
        touched: false,
    };

    /// Current raw input.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Last computed error message, empty when the value was accepted.
    #[must_use]
    pub fn error(&self) -> &str {
        self.error.as_str()
    }

    /// Whether the field has lost focus at least once.
    #[must_use]
    pub const fn is_touched(&self) -> bool {
        self.touched
    }

    /// Error to display, suppressed until the field has been touched.
    #[must_use]
    pub fn visible_error(&self) -> Option<&str> {
        (self.touched && !self.error.is_empty()).then_some(self.error.as_str())
    }
}

/// Accessibility attributes derived from a field's (error, touched) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessibility {
    /// Whether the input should be flagged invalid.
    pub invalid: bool,
    /// Element describing the input, present only while an error is shown.
    pub described_by: Option<String>,
}

impl FieldAccessibility {
    /// Derive the attributes for `field` from its current state.
    #[must_use]
    pub fn derive(field: FieldId, state: &FieldState) -> Self {
        let invalid = state.visible_error().is_some();
        Self {
            invalid,
            described_by: invalid.then(|| field.error_element_id()),
        }
    }
}
