//! Domain primitives and the form controller.
//!
//! Purpose: define the registration fields, their validators and the
//! controller that turns change/blur/submit events into per-field state.
//! Storage and notification are reached only through [`ports`].
//!
//! Public surface:
//! - `FieldId`, `FieldState`, `FieldAccessibility` — field identity and state.
//! - `validation` — pure validators and the per-field dispatch table.
//! - `RegistrationForm` — the stateful controller.
//! - `SubmittedRecord` — the snapshot persisted under `USER_DATA_KEY`.
//! - `Notification` — the success message handed to a notifier.

pub mod field;
pub mod form;
pub mod notification;
pub mod ports;
pub mod record;
pub mod validation;

pub use self::field::{FieldAccessibility, FieldId, FieldState, UnknownFieldError};
pub use self::form::{
    RegistrationForm, StoredRecordError, SubmitError, SubmitOutcome, load_submitted_record,
};
pub use self::notification::{DEFAULT_NOTIFICATION_DURATION, Notification, SUCCESS_MESSAGE};
pub use self::record::{SubmittedRecord, USER_DATA_KEY};
pub use self::validation::{AgePolicy, FieldValidationError, ValidationContext};
