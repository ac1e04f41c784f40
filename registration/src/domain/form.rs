//! Registration form controller.
//!
//! Holds one [`FieldState`] per [`FieldId`] and applies the change/blur/submit
//! transitions:
//!
//! - change: store the value; revalidate only if the field was touched.
//! - blur: store the value, mark touched, always revalidate.
//! - submit: when every field is filled and valid, persist a timestamped
//!   [`SubmittedRecord`] under [`USER_DATA_KEY`], notify, then reset.
//!
//! Validation failures never escape as errors; they become the field's
//! error string. Only storage failures are reported to the caller.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use mockable::Clock;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::field::{FieldAccessibility, FieldId, FieldState};
use super::notification::{DEFAULT_NOTIFICATION_DURATION, Notification};
use super::ports::{KeyValueStore, KeyValueStoreError, Notifier};
use super::record::{SubmittedRecord, USER_DATA_KEY};
use super::validation::{AgePolicy, ValidationContext, check_field, validate_field};

/// Errors returned by [`RegistrationForm::on_submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The record could not be encoded.
    #[error("failed to encode submitted record: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The store rejected the write; form state is left untouched.
    #[error("failed to persist submitted record: {0}")]
    Storage(#[from] KeyValueStoreError),
}

/// Errors returned when reading the stored record back.
#[derive(Debug, Error)]
pub enum StoredRecordError {
    /// The store could not be read.
    #[error("failed to read stored record: {0}")]
    Storage(#[from] KeyValueStoreError),
    /// The stored value is not a valid record.
    #[error("stored record is malformed: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Result of a submit attempt that did not hit a storage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The form was incomplete or invalid; nothing was written.
    Rejected,
    /// The record was stored and the form reset.
    Submitted(SubmittedRecord),
}

/// Read the most recent submission from `store`.
///
/// # Examples
/// ```
/// use registration_form::domain::load_submitted_record;
/// use registration_form::outbound::storage::InMemoryKeyValueStore;
///
/// let store = InMemoryKeyValueStore::default();
/// assert!(load_submitted_record(&store)?.is_none());
/// # Ok::<(), registration_form::domain::StoredRecordError>(())
/// ```
pub fn load_submitted_record<S>(store: &S) -> Result<Option<SubmittedRecord>, StoredRecordError>
where
    S: KeyValueStore + ?Sized,
{
    store
        .get(USER_DATA_KEY)?
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(StoredRecordError::from)
}

static UNTOUCHED: FieldState = FieldState::UNTOUCHED;

/// Stateful controller for the six-field registration form.
///
/// `S` may be unsized, so `RegistrationForm<dyn KeyValueStore, N>` can hold
/// any store behind an `Arc`.
pub struct RegistrationForm<S: ?Sized, N> {
    fields: BTreeMap<FieldId, FieldState>,
    store: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<dyn Clock>,
    age_policy: AgePolicy,
    notification_duration: Duration,
}

impl<S: ?Sized, N> RegistrationForm<S, N> {
    /// Create an empty, untouched form.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use registration_form::domain::{FieldId, RegistrationForm};
    /// use registration_form::outbound::notification::TracingNotifier;
    /// use registration_form::outbound::storage::InMemoryKeyValueStore;
    ///
    /// let mut form = RegistrationForm::new(
    ///     Arc::new(InMemoryKeyValueStore::default()),
    ///     Arc::new(TracingNotifier),
    ///     Arc::new(DefaultClock),
    /// );
    /// form.on_change(FieldId::Email, "not-an-email");
    /// assert!(form.field(FieldId::Email).visible_error().is_none());
    /// form.on_blur(FieldId::Email, "not-an-email");
    /// assert_eq!(form.field(FieldId::Email).visible_error(), Some("Invalid email address"));
    /// ```
    pub fn new(store: Arc<S>, notifier: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self {
            fields: Self::blank_fields(),
            store,
            notifier,
            clock,
            age_policy: AgePolicy::default(),
            notification_duration: DEFAULT_NOTIFICATION_DURATION,
        }
    }

    /// Replace the accepted age range.
    #[must_use]
    pub fn with_age_policy(mut self, age_policy: AgePolicy) -> Self {
        self.age_policy = age_policy;
        self
    }

    /// Replace the success notification's auto-dismiss delay.
    #[must_use]
    pub fn with_notification_duration(mut self, duration: Duration) -> Self {
        self.notification_duration = duration;
        self
    }

    fn blank_fields() -> BTreeMap<FieldId, FieldState> {
        FieldId::ALL
            .into_iter()
            .map(|field| (field, FieldState::default()))
            .collect()
    }

    fn validation_context(&self) -> ValidationContext {
        ValidationContext {
            today: self.clock.utc().date_naive(),
            age_policy: self.age_policy,
        }
    }

    fn field_mut(&mut self, field: FieldId) -> &mut FieldState {
        // Every field is inserted at construction and reset, so this never grows the map.
        self.fields.entry(field).or_default()
    }

    fn revalidate(field: FieldId, state: &mut FieldState, context: &ValidationContext) {
        state.error = validate_field(field, &state.value, context);
        debug!(field = field.key(), valid = state.error.is_empty(), "field revalidated");
    }

    /// Record new input for `field`.
    ///
    /// Errors are recomputed only once the field has been touched, so a user
    /// typing their first pass does not see premature messages.
    pub fn on_change(&mut self, field: FieldId, value: impl Into<String>) {
        let context = self.validation_context();
        let state = self.field_mut(field);
        state.value = value.into();
        if state.touched {
            Self::revalidate(field, state, &context);
        }
    }

    /// Record that `field` lost focus holding `value`.
    pub fn on_blur(&mut self, field: FieldId, value: impl Into<String>) {
        let context = self.validation_context();
        let state = self.field_mut(field);
        state.value = value.into();
        state.touched = true;
        Self::revalidate(field, state, &context);
    }

    /// State of `field`.
    #[must_use]
    pub fn field(&self, field: FieldId) -> &FieldState {
        self.fields.get(&field).unwrap_or(&UNTOUCHED)
    }

    /// All fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &FieldState)> {
        self.fields.iter().map(|(field, state)| (*field, state))
    }

    /// Error to display for `field`, if any.
    #[must_use]
    pub fn visible_error(&self, field: FieldId) -> Option<&str> {
        self.field(field).visible_error()
    }

    /// Accessibility attributes for `field`.
    #[must_use]
    pub fn accessibility(&self, field: FieldId) -> FieldAccessibility {
        FieldAccessibility::derive(field, self.field(field))
    }

    /// Whether every field is non-blank and passes its validator.
    ///
    /// Computed from values alone, so it is accurate before any field has
    /// been touched.
    #[must_use]
    pub fn is_form_valid(&self) -> bool {
        let context = self.validation_context();
        self.fields.iter().all(|(field, state)| {
            !state.value.trim().is_empty() && check_field(*field, &state.value, &context).is_ok()
        })
    }

    /// Whether the submit control should be enabled.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.is_form_valid()
    }

    fn snapshot(&self, timestamp: DateTime<Utc>) -> SubmittedRecord {
        let value = |field: FieldId| self.field(field).value.clone();
        SubmittedRecord {
            first_name: value(FieldId::FirstName),
            last_name: value(FieldId::LastName),
            email: value(FieldId::Email),
            birth_date: value(FieldId::BirthDate),
            postal_code: value(FieldId::PostalCode),
            city: value(FieldId::City),
            timestamp,
        }
    }

    fn reset(&mut self) {
        self.fields = Self::blank_fields();
    }
}

impl<S, N> RegistrationForm<S, N>
where
    S: KeyValueStore + ?Sized,
    N: Notifier,
{
    /// Persist the form when valid, notify, and reset.
    ///
    /// # Errors
    /// Returns [`SubmitError`] when the record cannot be encoded or stored.
    /// The form keeps its values, errors and touched flags in that case and
    /// no notification is sent.
    pub fn on_submit(&mut self) -> Result<SubmitOutcome, SubmitError> {
        if !self.is_form_valid() {
            debug!("submit rejected: form incomplete or invalid");
            return Ok(SubmitOutcome::Rejected);
        }

        let record = self.snapshot(self.clock.utc());
        let payload = serde_json::to_string(&record)?;
        if let Err(error) = self.store.set(USER_DATA_KEY, &payload) {
            warn!(%error, key = USER_DATA_KEY, "failed to persist submitted record");
            return Err(SubmitError::Storage(error));
        }

        info!(timestamp = %record.timestamp, "registration submitted");
        self.notifier
            .notify(&Notification::success(self.notification_duration));
        self.reset();
        Ok(SubmitOutcome::Submitted(record))
    }

    /// Read back the last stored submission.
    ///
    /// # Errors
    /// Returns [`StoredRecordError`] when the store fails or holds an
    /// undecodable value.
    pub fn load_stored_record(&self) -> Result<Option<SubmittedRecord>, StoredRecordError> {
        load_submitted_record(self.store.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockKeyValueStore, MockNotifier};
    use crate::outbound::storage::InMemoryKeyValueStore;
    use crate::test_support::{MutableClock, RecordingNotifier};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    type TestForm = RegistrationForm<InMemoryKeyValueStore, RecordingNotifier>;

    struct Harness {
        form: TestForm,
        store: Arc<InMemoryKeyValueStore>,
        notifier: Arc<RecordingNotifier>,
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn harness() -> Harness {
        let store = Arc::new(InMemoryKeyValueStore::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let form = RegistrationForm::new(
            Arc::clone(&store),
            Arc::clone(&notifier),
            Arc::new(MutableClock::new(fixed_now())),
        );
        Harness {
            form,
            store,
            notifier,
        }
    }

    const VALID: [(FieldId, &str); 6] = [
        (FieldId::FirstName, "Jane"),
        (FieldId::LastName, "Doe"),
        (FieldId::Email, "jane@example.com"),
        (FieldId::BirthDate, "1990-05-01"),
        (FieldId::PostalCode, "75001"),
        (FieldId::City, "Paris"),
    ];

    const INVALID: [(FieldId, &str); 6] = [
        (FieldId::FirstName, "J4ne"),
        (FieldId::LastName, ""),
        (FieldId::Email, "not-an-email"),
        (FieldId::BirthDate, "2020-01-01"),
        (FieldId::PostalCode, "ABCDE"),
        (FieldId::City, "P@ris"),
    ];

    fn fill<S: ?Sized, N>(form: &mut RegistrationForm<S, N>, values: &[(FieldId, &str)]) {
        for (field, value) in values {
            form.on_change(*field, *value);
        }
    }

    fn assert_pristine<S: ?Sized, N>(form: &RegistrationForm<S, N>) {
        for (field, state) in form.fields() {
            assert_eq!(state, &FieldState::default(), "{field} should be reset");
        }
    }

    #[rstest]
    fn starts_with_exactly_six_untouched_fields(harness: Harness) {
        let fields: Vec<FieldId> = harness.form.fields().map(|(field, _)| field).collect();
        assert_eq!(fields, FieldId::ALL);
        assert_pristine(&harness.form);
        assert!(!harness.form.is_form_valid());
    }

    #[rstest]
    fn blur_with_invalid_value_sets_error_and_touched(mut harness: Harness) {
        for (field, value) in INVALID {
            harness.form.on_blur(field, value);
            let state = harness.form.field(field);
            assert!(state.is_touched(), "{field} should be touched");
            assert!(!state.error().is_empty(), "{field} should carry an error");
            assert!(harness.form.accessibility(field).invalid);
        }
    }

    #[rstest]
    fn change_before_blur_never_sets_error(mut harness: Harness) {
        fill(&mut harness.form, &INVALID);
        for (field, state) in harness.form.fields() {
            assert!(state.error().is_empty(), "{field} error should be suppressed");
            assert!(!state.is_touched());
            assert!(harness.form.visible_error(field).is_none());
        }
    }

    #[rstest]
    fn change_after_blur_revalidates_live(mut harness: Harness) {
        for ((field, bad), (_, good)) in INVALID.into_iter().zip(VALID) {
            harness.form.on_blur(field, bad);
            harness.form.on_change(field, good);
            assert_eq!(harness.form.field(field).error(), "", "{field} should clear");

            harness.form.on_change(field, bad);
            assert!(!harness.form.field(field).error().is_empty(), "{field} should fail again");
        }
    }

    #[rstest]
    fn repeated_blur_is_idempotent(mut harness: Harness) {
        harness.form.on_blur(FieldId::PostalCode, "ABCDE");
        let first = harness.form.field(FieldId::PostalCode).clone();
        harness.form.on_blur(FieldId::PostalCode, "ABCDE");
        assert_eq!(harness.form.field(FieldId::PostalCode), &first);
        assert_eq!(first.error(), "Postal code must be exactly 5 digits");
    }

    #[rstest]
    fn empty_birth_date_reports_required_verbatim(mut harness: Harness) {
        harness.form.on_blur(FieldId::BirthDate, "");
        assert_eq!(
            harness.form.visible_error(FieldId::BirthDate),
            Some("Birth date is required")
        );
    }

    #[rstest]
    fn validity_ignores_touched_state(mut harness: Harness) {
        fill(&mut harness.form, &VALID);
        assert!(harness.form.is_form_valid());
        assert!(harness.form.can_submit());

        harness.form.on_change(FieldId::City, "   ");
        assert!(!harness.form.is_form_valid());
    }

    #[rstest]
    #[case(FieldId::FirstName, "J4ne")]
    #[case(FieldId::Email, "not-an-email")]
    #[case(FieldId::BirthDate, "2010-01-01")]
    #[case(FieldId::PostalCode, "7500")]
    fn any_invalid_field_makes_form_invalid(
        mut harness: Harness,
        #[case] field: FieldId,
        #[case] value: &str,
    ) {
        fill(&mut harness.form, &VALID);
        harness.form.on_change(field, value);
        assert!(!harness.form.is_form_valid());
    }

    #[rstest]
    fn submit_persists_record_notifies_and_resets(mut harness: Harness) {
        fill(&mut harness.form, &VALID);
        harness.form.on_blur(FieldId::City, "Paris");

        let outcome = harness.form.on_submit().expect("submit succeeds");
        let SubmitOutcome::Submitted(record) = outcome else {
            panic!("expected submission, got {outcome:?}");
        };
        assert_eq!(record.timestamp, fixed_now());
        assert_eq!(record.city, "Paris");

        let stored = harness
            .store
            .get(USER_DATA_KEY)
            .expect("store readable")
            .expect("record stored");
        let decoded: SubmittedRecord = serde_json::from_str(&stored).expect("decode record");
        assert_eq!(decoded, record);
        assert_eq!(
            harness.form.load_stored_record().expect("load record"),
            Some(record)
        );

        assert_eq!(
            harness.notifier.notifications(),
            vec![Notification::success(DEFAULT_NOTIFICATION_DURATION)]
        );
        assert_pristine(&harness.form);
    }

    #[rstest]
    fn submit_overwrites_previous_record(mut harness: Harness) {
        fill(&mut harness.form, &VALID);
        harness.form.on_submit().expect("first submit");
        fill(&mut harness.form, &VALID);
        harness.form.on_change(FieldId::City, "Lyon");
        harness.form.on_submit().expect("second submit");

        let stored = harness
            .form
            .load_stored_record()
            .expect("load record")
            .expect("record present");
        assert_eq!(stored.city, "Lyon");
        assert_eq!(harness.store.len(), 1);
    }

    #[rstest]
    fn invalid_submit_is_a_no_op(mut harness: Harness) {
        fill(&mut harness.form, &VALID);
        harness.form.on_change(FieldId::Email, "not-an-email");

        let outcome = harness.form.on_submit().expect("no storage error");
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert!(harness.store.is_empty());
        assert!(harness.notifier.notifications().is_empty());
        assert_eq!(harness.form.field(FieldId::Email).value(), "not-an-email");

        harness.form.on_blur(FieldId::Email, "not-an-email");
        assert!(!harness.form.field(FieldId::Email).error().is_empty());
    }

    #[rstest]
    fn storage_failure_keeps_state_and_skips_notification() {
        let mut store = MockKeyValueStore::new();
        store
            .expect_set()
            .times(1)
            .returning(|key, _| Err(KeyValueStoreError::write(key, "quota exceeded")));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().never();

        let mut form = RegistrationForm::new(
            Arc::new(store),
            Arc::new(notifier),
            Arc::new(MutableClock::new(fixed_now())),
        );
        fill(&mut form, &VALID);
        form.on_blur(FieldId::Email, "jane@example.com");

        let error = form.on_submit().expect_err("storage failure surfaces");
        let SubmitError::Storage(KeyValueStoreError::Write { key, .. }) = error else {
            panic!("expected storage write error, got {error:?}");
        };
        assert_eq!(key, USER_DATA_KEY);
        assert_eq!(form.field(FieldId::FirstName).value(), "Jane");
        assert!(form.field(FieldId::Email).is_touched());
    }

    #[rstest]
    fn configured_policy_and_duration_are_applied() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mut form = RegistrationForm::new(
            Arc::new(InMemoryKeyValueStore::default()),
            Arc::clone(&notifier),
            Arc::new(MutableClock::new(fixed_now())),
        )
        .with_age_policy(AgePolicy {
            minimum_years: 16,
            maximum_years: 120,
        })
        .with_notification_duration(Duration::from_millis(500));

        fill(&mut form, &VALID);
        form.on_change(FieldId::BirthDate, "2007-01-01");
        assert!(form.is_form_valid());
        form.on_submit().expect("submit succeeds");

        assert_eq!(
            notifier.notifications(),
            vec![Notification::success(Duration::from_millis(500))]
        );
    }

    #[rstest]
    fn malformed_stored_value_is_reported() {
        let store = InMemoryKeyValueStore::default();
        store.set(USER_DATA_KEY, "{not json").expect("seed store");
        let error = load_submitted_record(&store).expect_err("decode failure");
        assert!(matches!(error, StoredRecordError::Decode(_)));
    }
}
