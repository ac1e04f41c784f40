//! Line-oriented terminal front end for the registration form.
//!
//! The session prompts for the first field that is still pending (never
//! entered, or entered with an error). Each submitted line is replayed as a
//! change event followed by a blur event, which is what a browser input sees
//! when the user types a value and tabs away. Lines starting with `:` are
//! commands:
//!
//! - `:submit` submits the form (refused while it is invalid).
//! - `:set <field>=<value>` revisits any field by its key, e.g. `:set city=Lyon`.
//! - `:show` prints the record currently in storage.
//! - `:quit` leaves without submitting.

use std::io::{self, BufRead, Write};

use crate::domain::ports::{KeyValueStore, Notifier};
use crate::domain::{FieldId, RegistrationForm, SubmitOutcome, SubmittedRecord};

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// The form was stored.
    Submitted(SubmittedRecord),
    /// The user quit or input ran out.
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Submit,
    Show,
    Quit,
    Set(FieldId, &'a str),
    Unknown(&'a str),
    Input(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let Some(command) = line.strip_prefix(':') else {
            return Self::Input(line);
        };
        match command.trim() {
            "submit" => Self::Submit,
            "show" => Self::Show,
            "quit" | "q" => Self::Quit,
            other => other
                .strip_prefix("set ")
                .and_then(|assignment| assignment.split_once('='))
                .and_then(|(key, value)| Some(Self::Set(key.trim().parse().ok()?, value)))
                .unwrap_or(Self::Unknown(other)),
        }
    }
}

/// Interactive session driving a [`RegistrationForm`].
pub struct TerminalSession<R, W, S: ?Sized, N> {
    input: R,
    output: W,
    form: RegistrationForm<S, N>,
}

impl<R, W, S, N> TerminalSession<R, W, S, N>
where
    R: BufRead,
    W: Write,
    S: KeyValueStore + ?Sized,
    N: Notifier,
{
    /// Bind a form to an input and output stream.
    pub fn new(input: R, output: W, form: RegistrationForm<S, N>) -> Self {
        Self {
            input,
            output,
            form,
        }
    }

    /// Consume the session, returning the output stream.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until the form is submitted, the user quits, or input ends.
    ///
    /// # Errors
    /// Returns I/O errors from the underlying streams. Storage failures on
    /// submit are reported to the user and the session continues.
    pub fn run(&mut self) -> io::Result<SessionEnd> {
        writeln!(
            self.output,
            "Registration form. Commands: :submit, :set <field>=<value>, :show, :quit"
        )?;
        loop {
            self.prompt()?;
            let Some(line) = self.read_line()? else {
                return Ok(SessionEnd::Quit);
            };
            match Command::parse(&line) {
                Command::Quit => return Ok(SessionEnd::Quit),
                Command::Submit => {
                    if let Some(record) = self.submit()? {
                        return Ok(SessionEnd::Submitted(record));
                    }
                }
                Command::Show => self.show_stored()?,
                Command::Set(field, value) => self.enter(field, value)?,
                Command::Unknown(command) => {
                    writeln!(self.output, "Unknown command: :{command}")?;
                }
                Command::Input(value) => match self.pending_field() {
                    Some(field) => self.enter(field, value)?,
                    None => writeln!(
                        self.output,
                        "All fields are filled. Type :submit to save or :set to change a field."
                    )?,
                },
            }
        }
    }

    fn pending_field(&self) -> Option<FieldId> {
        self.form
            .fields()
            .find(|(_, state)| !state.is_touched() || !state.error().is_empty())
            .map(|(field, _)| field)
    }

    fn prompt(&mut self) -> io::Result<()> {
        match self.pending_field() {
            Some(field) => write!(self.output, "{}: ", field.label())?,
            None => {
                let status = if self.form.can_submit() {
                    "enabled"
                } else {
                    "disabled"
                };
                write!(self.output, "[submit {status}] > ")?;
            }
        }
        self.output.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    fn enter(&mut self, field: FieldId, value: &str) -> io::Result<()> {
        self.form.on_change(field, value);
        self.form.on_blur(field, value);
        if let Some(error) = self.form.visible_error(field) {
            let described_by = self
                .form
                .accessibility(field)
                .described_by
                .unwrap_or_default();
            writeln!(self.output, "  ✘ {error} [{described_by}]")?;
        }
        Ok(())
    }

    fn submit(&mut self) -> io::Result<Option<SubmittedRecord>> {
        match self.form.on_submit() {
            Ok(SubmitOutcome::Submitted(record)) => Ok(Some(record)),
            Ok(SubmitOutcome::Rejected) => {
                writeln!(
                    self.output,
                    "Submit is disabled until every field is filled in and valid."
                )?;
                Ok(None)
            }
            Err(error) => {
                writeln!(self.output, "  ✘ {error}")?;
                Ok(None)
            }
        }
    }

    fn show_stored(&mut self) -> io::Result<()> {
        match self.form.load_stored_record() {
            Ok(Some(record)) => {
                let json = serde_json::to_string_pretty(&record).map_err(io::Error::other)?;
                writeln!(self.output, "{json}")
            }
            Ok(None) => writeln!(self.output, "No stored record."),
            Err(error) => writeln!(self.output, "  ✘ {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::storage::InMemoryKeyValueStore;
    use crate::test_support::{FailingKeyValueStore, MutableClock, RecordingNotifier};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use std::io::Cursor;
    use std::sync::Arc;

    fn form_with<S>(store: Arc<S>) -> RegistrationForm<S, RecordingNotifier> {
        let now = Utc
            .with_ymd_and_hms(2024, 6, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp");
        RegistrationForm::new(
            store,
            Arc::new(RecordingNotifier::default()),
            Arc::new(MutableClock::new(now)),
        )
    }

    fn run_script<S: KeyValueStore>(store: Arc<S>, script: &str) -> (SessionEnd, String) {
        let mut session =
            TerminalSession::new(Cursor::new(script.to_owned()), Vec::new(), form_with(store));
        let end = session.run().expect("session runs");
        let output = String::from_utf8(session.into_output()).expect("utf-8 output");
        (end, output)
    }

    #[rstest]
    #[case(":submit", Command::Submit)]
    #[case(":show", Command::Show)]
    #[case(":q", Command::Quit)]
    #[case(":set city=Lyon", Command::Set(FieldId::City, "Lyon"))]
    #[case(":set nickname=x", Command::Unknown("set nickname=x"))]
    #[case(":dance", Command::Unknown("dance"))]
    #[case("Jane", Command::Input("Jane"))]
    fn parses_commands(#[case] line: &str, #[case] expected: Command<'_>) {
        assert_eq!(Command::parse(line), expected);
    }

    #[rstest]
    fn guided_entry_reprompts_until_valid_then_submits() {
        let store = Arc::new(InMemoryKeyValueStore::default());
        let script = "Jane\nDoe\nnot-an-email\njane@example.com\n\n1990-05-01\nABCDE\n75001\nParis\n:submit\n";
        let (end, output) = run_script(Arc::clone(&store), script);

        let SessionEnd::Submitted(record) = end else {
            panic!("expected submission, got {end:?}");
        };
        assert_eq!(record.email, "jane@example.com");
        assert!(output.contains("✘ Invalid email address [email-error]"));
        assert!(output.contains("✘ Birth date is required [birthDate-error]"));
        assert!(output.contains("✘ Postal code must be exactly 5 digits [postalCode-error]"));
        assert!(output.contains("[submit enabled] > "));
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn submit_is_refused_while_invalid() {
        let store = Arc::new(InMemoryKeyValueStore::default());
        let (end, output) = run_script(Arc::clone(&store), "Jane\n:submit\n:quit\n");
        assert_eq!(end, SessionEnd::Quit);
        assert!(output.contains("Submit is disabled"));
        assert!(store.is_empty());
    }

    #[rstest]
    fn set_command_revisits_a_field() {
        let store = Arc::new(InMemoryKeyValueStore::default());
        let script =
            "Jane\nDoe\njane@example.com\n1990-05-01\n75001\nParis\n:set city=Lyon\n:submit\n";
        let (end, _) = run_script(store, script);
        let SessionEnd::Submitted(record) = end else {
            panic!("expected submission, got {end:?}");
        };
        assert_eq!(record.city, "Lyon");
    }

    #[rstest]
    fn storage_failure_is_reported_and_session_continues() {
        let script = "Jane\nDoe\njane@example.com\n1990-05-01\n75001\nParis\n:submit\n";
        let (end, output) = run_script(Arc::new(FailingKeyValueStore), script);
        assert_eq!(end, SessionEnd::Quit);
        assert!(output.contains("failed to persist submitted record"));
    }

    #[rstest]
    fn show_reports_missing_record() {
        let (end, output) = run_script(Arc::new(InMemoryKeyValueStore::default()), ":show\n");
        assert_eq!(end, SessionEnd::Quit);
        assert!(output.contains("No stored record."));
    }
}
