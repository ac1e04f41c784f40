//! Field validators.
//!
//! Each validator inspects one raw value and either accepts it or returns a
//! [`FieldValidationError`] whose `Display` output is the message shown to
//! the user. Validators hold no state; the only external input is the
//! [`ValidationContext`], which pins "today" and the age bounds.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use super::field::FieldId;

/// Maximum number of characters accepted for name-like fields.
pub const IDENTITY_MAX_LENGTH: usize = 50;
/// Exact number of digits in a postal code.
pub const POSTAL_CODE_LENGTH: usize = 5;
/// Format accepted for birth dates.
pub const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a single field value is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldValidationError {
    /// Name-like field is blank.
    #[error("This field is required")]
    Required,
    /// Name-like field exceeds the length cap.
    #[error("Must be at most {max} characters")]
    TooLong {
        /// Character cap.
        max: usize,
    },
    /// Name-like field contains something other than letters, spaces,
    /// apostrophes or hyphens.
    #[error("Invalid characters")]
    InvalidCharacters,
    /// Email does not look like `local@domain.tld`.
    #[error("Invalid email address")]
    InvalidEmail,
    /// Birth date input is blank.
    #[error("Birth date is required")]
    BirthDateRequired,
    /// Birth date input is not a calendar date.
    #[error("Invalid date format")]
    InvalidDateFormat,
    /// Birth date lies after today.
    #[error("Birth date cannot be in the future")]
    BirthDateInFuture,
    /// Applicant is younger than the minimum age.
    #[error("You must be at least {minimum} years old")]
    TooYoung {
        /// Minimum age in years.
        minimum: u32,
    },
    /// Applicant is older than any plausible age.
    #[error("Invalid birth date")]
    ImplausibleAge,
    /// Postal code is not exactly the expected number of digits.
    #[error("Postal code must be exactly {length} digits")]
    InvalidPostalCode {
        /// Required number of digits.
        length: usize,
    },
}

impl FieldValidationError {
    /// Stable machine-readable code, safe to log.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Required | Self::BirthDateRequired => "required",
            Self::TooLong { .. } => "too_long",
            Self::InvalidCharacters => "invalid_chars",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidDateFormat => "invalid_format",
            Self::BirthDateInFuture => "in_future",
            Self::TooYoung { .. } => "too_young",
            Self::ImplausibleAge => "too_old",
            Self::InvalidPostalCode { .. } => "invalid_postal_code",
        }
    }
}

/// Inclusive bounds on the applicant's age in completed years.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgePolicy {
    /// Youngest accepted age.
    pub minimum_years: u32,
    /// Oldest accepted age.
    pub maximum_years: u32,
}

impl AgePolicy {
    /// Default minimum age.
    pub const DEFAULT_MINIMUM_YEARS: u32 = 18;
    /// Default maximum age.
    pub const DEFAULT_MAXIMUM_YEARS: u32 = 120;
}

impl Default for AgePolicy {
    fn default() -> Self {
        Self {
            minimum_years: Self::DEFAULT_MINIMUM_YEARS,
            maximum_years: Self::DEFAULT_MAXIMUM_YEARS,
        }
    }
}

/// Inputs a validator may depend on besides the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Reference date for age calculations.
    pub today: NaiveDate,
    /// Accepted age range.
    pub age_policy: AgePolicy,
}

impl ValidationContext {
    /// Build a context with the default age policy.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            age_policy: AgePolicy::default(),
        }
    }
}

/// Uniform validator signature used by the dispatch table.
pub type Validator = fn(&str, &ValidationContext) -> Result<(), FieldValidationError>;

impl FieldId {
    /// Validator responsible for this field.
    #[must_use]
    pub fn validator(self) -> Validator {
        match self {
            Self::FirstName | Self::LastName | Self::City => identity_field,
            Self::Email => email_field,
            Self::BirthDate => validate_birth_date,
            Self::PostalCode => postal_code_field,
        }
    }
}

fn identity_field(raw: &str, _: &ValidationContext) -> Result<(), FieldValidationError> {
    validate_identity(raw)
}

fn email_field(raw: &str, _: &ValidationContext) -> Result<(), FieldValidationError> {
    validate_email(raw)
}

fn postal_code_field(raw: &str, _: &ValidationContext) -> Result<(), FieldValidationError> {
    validate_postal_code(raw)
}

static IDENTITY_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn identity_regex() -> &'static Regex {
    IDENTITY_RE.get_or_init(|| {
        // Length is enforced separately; letters may carry combining marks.
        let pattern = r"^\p{L}[\p{L}\p{M} '’-]*$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("identity regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validate a name-like value (first name, last name, city).
///
/// # Examples
/// ```
/// use registration_form::domain::validation::{FieldValidationError, validate_identity};
///
/// assert!(validate_identity("Jean-Pierre").is_ok());
/// assert_eq!(validate_identity("  "), Err(FieldValidationError::Required));
/// ```
pub fn validate_identity(raw: &str) -> Result<(), FieldValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldValidationError::Required);
    }
    if trimmed.chars().count() > IDENTITY_MAX_LENGTH {
        return Err(FieldValidationError::TooLong {
            max: IDENTITY_MAX_LENGTH,
        });
    }
    if !identity_regex().is_match(trimmed) {
        return Err(FieldValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Validate an email address.
pub fn validate_email(raw: &str) -> Result<(), FieldValidationError> {
    if email_regex().is_match(raw.trim()) {
        Ok(())
    } else {
        Err(FieldValidationError::InvalidEmail)
    }
}

/// Validate a parsed birth date against the age policy.
pub fn validate_age(
    birth_date: NaiveDate,
    today: NaiveDate,
    policy: AgePolicy,
) -> Result<(), FieldValidationError> {
    let Some(age) = today.years_since(birth_date) else {
        return Err(FieldValidationError::BirthDateInFuture);
    };
    if age < policy.minimum_years {
        return Err(FieldValidationError::TooYoung {
            minimum: policy.minimum_years,
        });
    }
    if age > policy.maximum_years {
        return Err(FieldValidationError::ImplausibleAge);
    }
    Ok(())
}

/// Validate raw birth date input.
///
/// Blank input is reported as missing before any parsing is attempted.
pub fn validate_birth_date(
    raw: &str,
    context: &ValidationContext,
) -> Result<(), FieldValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(FieldValidationError::BirthDateRequired);
    }
    let birth_date = NaiveDate::parse_from_str(trimmed, BIRTH_DATE_FORMAT)
        .map_err(|_| FieldValidationError::InvalidDateFormat)?;
    validate_age(birth_date, context.today, context.age_policy)
}

/// Validate a postal code: exactly five ASCII digits, no surrounding space.
pub fn validate_postal_code(raw: &str) -> Result<(), FieldValidationError> {
    if raw.len() == POSTAL_CODE_LENGTH && raw.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FieldValidationError::InvalidPostalCode {
            length: POSTAL_CODE_LENGTH,
        })
    }
}

/// Run the validator for `field`.
pub fn check_field(
    field: FieldId,
    raw: &str,
    context: &ValidationContext,
) -> Result<(), FieldValidationError> {
    (field.validator())(raw, context)
}

/// Run the validator for `field` and return its message, empty when valid.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use registration_form::domain::FieldId;
/// use registration_form::domain::validation::{ValidationContext, validate_field};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
/// let context = ValidationContext::new(today);
/// assert_eq!(validate_field(FieldId::BirthDate, "", &context), "Birth date is required");
/// assert_eq!(validate_field(FieldId::City, "Paris", &context), "");
/// ```
#[must_use]
pub fn validate_field(field: FieldId, raw: &str, context: &ValidationContext) -> String {
    check_field(field, raw, context)
        .err()
        .map(|error| error.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn context() -> ValidationContext {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date");
        ValidationContext::new(today)
    }

    #[rstest]
    #[case("Jane")]
    #[case("Doe")]
    #[case("Jean-Pierre")]
    #[case("O'Brien")]
    #[case("Saint Étienne")]
    #[case("  Paris  ")]
    fn identity_accepts_name_like_values(#[case] raw: &str) {
        assert_eq!(validate_identity(raw), Ok(()));
    }

    #[rstest]
    #[case("", FieldValidationError::Required)]
    #[case("   ", FieldValidationError::Required)]
    #[case("J4ne", FieldValidationError::InvalidCharacters)]
    #[case("-Jane", FieldValidationError::InvalidCharacters)]
    #[case("Jane!", FieldValidationError::InvalidCharacters)]
    fn identity_rejects_bad_values(#[case] raw: &str, #[case] expected: FieldValidationError) {
        assert_eq!(validate_identity(raw), Err(expected));
    }

    #[rstest]
    fn identity_enforces_length_cap() {
        let at_cap = "a".repeat(IDENTITY_MAX_LENGTH);
        assert_eq!(validate_identity(&at_cap), Ok(()));
        let over_cap = "a".repeat(IDENTITY_MAX_LENGTH + 1);
        assert_eq!(
            validate_identity(&over_cap),
            Err(FieldValidationError::TooLong {
                max: IDENTITY_MAX_LENGTH
            })
        );
    }

    #[rstest]
    #[case("jane@example.com", true)]
    #[case(" jane@example.com ", true)]
    #[case("jane.doe+news@mail.example.fr", true)]
    #[case("not-an-email", false)]
    #[case("jane@example", false)]
    #[case("jane@@example.com", false)]
    #[case("jane doe@example.com", false)]
    #[case("", false)]
    fn email_requires_local_domain_and_tld(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(validate_email(raw).is_ok(), accepted);
    }

    #[rstest]
    fn blank_birth_date_is_required_not_malformed(context: ValidationContext) {
        assert_eq!(
            validate_birth_date("", &context),
            Err(FieldValidationError::BirthDateRequired)
        );
        assert_eq!(
            validate_field(FieldId::BirthDate, "", &context),
            "Birth date is required"
        );
        assert_eq!(
            validate_field(FieldId::BirthDate, "01/05/1990", &context),
            "Invalid date format"
        );
    }

    #[rstest]
    #[case("1990-05-01", Ok(()))]
    #[case("2006-06-15", Ok(()))]
    #[case("2006-06-16", Err(FieldValidationError::TooYoung { minimum: 18 }))]
    #[case("2024-06-16", Err(FieldValidationError::BirthDateInFuture))]
    #[case("1903-06-16", Ok(()))]
    #[case("1903-06-15", Err(FieldValidationError::ImplausibleAge))]
    #[case("1990-02-30", Err(FieldValidationError::InvalidDateFormat))]
    fn birth_date_respects_age_bounds(
        context: ValidationContext,
        #[case] raw: &str,
        #[case] expected: Result<(), FieldValidationError>,
    ) {
        assert_eq!(validate_birth_date(raw, &context), expected);
    }

    #[rstest]
    fn age_policy_is_configurable() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date");
        let birth_date = NaiveDate::from_ymd_opt(2008, 1, 1).expect("valid date");
        let policy = AgePolicy {
            minimum_years: 16,
            maximum_years: 100,
        };
        assert_eq!(validate_age(birth_date, today, policy), Ok(()));
        assert_eq!(
            validate_age(birth_date, today, AgePolicy::default()),
            Err(FieldValidationError::TooYoung { minimum: 18 })
        );
    }

    #[rstest]
    #[case("75001", true)]
    #[case("01000", true)]
    #[case("ABCDE", false)]
    #[case("7500", false)]
    #[case("750011", false)]
    #[case(" 75001", false)]
    #[case("７５００１", false)]
    fn postal_code_is_five_ascii_digits(#[case] raw: &str, #[case] accepted: bool) {
        assert_eq!(validate_postal_code(raw).is_ok(), accepted);
    }

    #[rstest]
    fn every_field_dispatches_to_a_validator(context: ValidationContext) {
        for field in FieldId::ALL {
            assert!(
                !validate_field(field, "", &context).is_empty(),
                "{field} should reject blank input"
            );
        }
    }

    #[rstest]
    fn error_codes_are_stable() {
        assert_eq!(FieldValidationError::BirthDateRequired.code(), "required");
        assert_eq!(FieldValidationError::TooYoung { minimum: 18 }.code(), "too_young");
        assert_eq!(
            FieldValidationError::InvalidPostalCode { length: 5 }.to_string(),
            "Postal code must be exactly 5 digits"
        );
    }
}
