//! Registration form entry-point: loads settings, wires the form to its
//! storage and notifier, and runs the requested command.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use registration_form::FormSettings;
use registration_form::domain::ports::KeyValueStore;
use registration_form::domain::{RegistrationForm, load_submitted_record};
use registration_form::inbound::terminal::{SessionEnd, TerminalSession};
use registration_form::outbound::notification::TerminalNotifier;
use registration_form::outbound::storage::{FileKeyValueStore, InMemoryKeyValueStore};

const APP_NAME: &str = "registration-form";

/// `registration-form` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "registration-form",
    about = "Fill in the registration form and store the record locally",
    version
)]
struct CliArgs {
    /// Directory holding the stored record. Overrides configuration.
    #[arg(long = "store-dir", value_name = "path", global = true)]
    store_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum CliCommand {
    /// Fill in the form interactively (default).
    Fill {
        /// Keep the record in memory only; nothing is written to disk.
        #[arg(long = "in-memory")]
        in_memory: bool,
    },
    /// Print the stored record.
    Show,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    // Command-line arguments belong to clap; settings come from env and files.
    let settings = FormSettings::load_from_iter([OsString::from(APP_NAME)])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let store_dir = args.store_dir.unwrap_or_else(|| settings.store_dir());

    match args.command.unwrap_or(CliCommand::Fill { in_memory: false }) {
        CliCommand::Fill { in_memory } => {
            let store: Arc<dyn KeyValueStore> = if in_memory {
                Arc::new(InMemoryKeyValueStore::default())
            } else {
                Arc::new(open_store(&store_dir)?)
            };
            fill(store, &settings)
        }
        CliCommand::Show => show(&open_store(&store_dir)?),
    }
}

fn open_store(store_dir: &Path) -> io::Result<FileKeyValueStore> {
    FileKeyValueStore::open(store_dir).map_err(io::Error::other)
}

fn fill(store: Arc<dyn KeyValueStore>, settings: &FormSettings) -> io::Result<()> {
    let form = RegistrationForm::new(
        store,
        Arc::new(TerminalNotifier::new(io::stdout())),
        Arc::new(DefaultClock),
    )
    .with_age_policy(settings.age_policy())
    .with_notification_duration(settings.notification_duration());

    let stdin = io::stdin();
    let mut session = TerminalSession::new(stdin.lock(), io::stdout(), form);
    match session.run()? {
        SessionEnd::Submitted(record) => {
            info!(timestamp = %record.timestamp, "session ended with submission");
        }
        SessionEnd::Quit => info!("session ended without submission"),
    }
    Ok(())
}

fn show(store: &FileKeyValueStore) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match load_submitted_record(store).map_err(io::Error::other)? {
        Some(record) => {
            let json = serde_json::to_string_pretty(&record).map_err(io::Error::other)?;
            writeln!(stdout, "{json}")
        }
        None => writeln!(stdout, "No stored record."),
    }
}
