//! Persisted registration snapshot.
//!
//! The record is serialised to JSON with camelCase keys and an ISO 8601
//! timestamp carrying millisecond precision and a `Z` suffix:
//!
//! ```json
//! {"firstName":"Jane","lastName":"Doe","email":"jane@example.com",
//!  "birthDate":"1990-05-01","postalCode":"75001","city":"Paris",
//!  "timestamp":"2024-06-15T09:30:00.000Z"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldId;

/// Storage key holding the most recent submission.
pub const USER_DATA_KEY: &str = "userData";

/// Form values captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedRecord {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email address.
    pub email: String,
    /// Birth date as entered.
    pub birth_date: String,
    /// Postal code as entered.
    pub postal_code: String,
    /// City of residence.
    pub city: String,
    /// Capture time.
    #[serde(with = "iso_timestamp")]
    pub timestamp: DateTime<Utc>,
}

impl SubmittedRecord {
    /// Value captured for `field`.
    #[must_use]
    pub fn value(&self, field: FieldId) -> &str {
        match field {
            FieldId::FirstName => &self.first_name,
            FieldId::LastName => &self.last_name,
            FieldId::Email => &self.email,
            FieldId::BirthDate => &self.birth_date,
            FieldId::PostalCode => &self.postal_code,
            FieldId::City => &self.city,
        }
    }
}

mod iso_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub(super) fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|parsed| parsed.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
