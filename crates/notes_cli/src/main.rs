//! Headless command-line front-end for the notes store.
//!
//! # Responsibility
//! - Drive every store operation without a windowing toolkit.
//! - Keep stdout machine-friendly: one record per line, ids first.
//!
//! # Invariants
//! - Lookups that find nothing exit with status 1 and never panic.
//! - Store errors are reported on stderr with status 1.

use clap::{Parser, Subcommand};
use log::info;
use notes_core::{
    core_version, default_log_level, init_logging, LoggingError, NoteId, NotesSession,
    StoreConfig,
};
use std::error::Error;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "notes", version, about = "Manage notes stored in a JSON index")]
struct Cli {
    /// Directory holding notes_index.json (defaults to NOTES_MANAGER_DIR or
    /// ~/Documents/NotesManager).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "NOTES_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    #[command(flatten)]
    Note(NoteCommand),
    /// Print the core library version.
    Version,
}

/// Commands that open the store.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum NoteCommand {
    /// List ids and titles, most recently modified first.
    List,
    /// List titles only, most recently modified first.
    Titles,
    /// Print one note by id.
    Show { id: String },
    /// Print the content of the first note with this title.
    ShowTitle { title: String },
    /// Create a note, or update the note with --id. Reads content from stdin
    /// when --content is omitted.
    Save {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a note by id.
    Delete { id: String },
    /// Delete the first note with this title.
    DeleteTitle { title: String },
    /// Exit 0 when a note with this id exists.
    Exists { id: String },
    /// Exit 0 when a note with this title exists.
    ExistsTitle { title: String },
    /// Print the id of the first note with this title.
    FindId { title: String },
}

/// Whether the command found what it was asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Found,
    NotFound,
}

impl From<Outcome> for ExitCode {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Found => ExitCode::SUCCESS,
            Outcome::NotFound => ExitCode::FAILURE,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(outcome) => outcome.into(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome, Box<dyn Error>> {
    let mut stdout = std::io::stdout().lock();
    let command = match cli.command {
        Command::Version => {
            writeln!(stdout, "notes_core version={}", core_version())?;
            return Ok(Outcome::Found);
        }
        Command::Note(command) => command,
    };

    let config = StoreConfig::resolve(cli.data_dir);
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    let log_dir = std::path::absolute(config.log_dir())?;
    match init_logging(level, &log_dir) {
        Ok(()) => {}
        Err(err @ LoggingError::UnsupportedLevel(_)) => return Err(err.into()),
        Err(err) => eprintln!("warning: file logging disabled: {err}"),
    }

    let mut session = NotesSession::open(&config)?;
    if let notes_core::LoadStatus::Recovered { reason } = session.store().load_status() {
        eprintln!(
            "warning: ignoring unusable {} ({reason}); it will be replaced on the next save",
            session.store().index_path().display()
        );
    }
    info!(
        "event=cli_command module=cli status=start notes={}",
        session.store().len()
    );

    execute(&mut session, command, std::io::stdin().lock(), &mut stdout)
}

fn execute(
    session: &mut NotesSession,
    command: NoteCommand,
    mut input: impl Read,
    out: &mut impl Write,
) -> Result<Outcome, Box<dyn Error>> {
    match command {
        NoteCommand::List => {
            for entry in session.entries() {
                writeln!(out, "{}\t{}", entry.id, entry.title)?;
            }
            Ok(Outcome::Found)
        }
        NoteCommand::Titles => {
            for title in session.store().list_titles() {
                writeln!(out, "{title}")?;
            }
            Ok(Outcome::Found)
        }
        NoteCommand::Show { id } => {
            let Some(note) = session.select(&NoteId::from(id)) else {
                return Ok(Outcome::NotFound);
            };
            writeln!(out, "id: {}", note.id)?;
            writeln!(out, "title: {}", note.title)?;
            writeln!(out, "created: {}", note.created_at.to_rfc3339())?;
            writeln!(out, "modified: {}", note.modified_at.to_rfc3339())?;
            writeln!(out)?;
            writeln!(out, "{}", note.content)?;
            Ok(Outcome::Found)
        }
        NoteCommand::ShowTitle { title } => match session.store().load_by_title(&title) {
            Some(content) => {
                writeln!(out, "{content}")?;
                Ok(Outcome::Found)
            }
            None => Ok(Outcome::NotFound),
        },
        NoteCommand::Save { id, title, content } => {
            let content = match content {
                Some(content) => content,
                None => {
                    let mut buffer = String::new();
                    input.read_to_string(&mut buffer)?;
                    buffer
                }
            };
            match id {
                Some(id) => {
                    session.select(&NoteId::from(id));
                }
                None => {
                    session.new_note();
                }
            }
            let saved = session.save_current(title, content)?;
            writeln!(out, "{saved}")?;
            Ok(Outcome::Found)
        }
        NoteCommand::Delete { id } => {
            if session.select(&NoteId::from(id)).is_none() {
                return Ok(Outcome::NotFound);
            }
            found(session.delete_current()?)
        }
        NoteCommand::DeleteTitle { title } => found(session.store_mut().delete_by_title(&title)?),
        NoteCommand::Exists { id } => found(session.store().exists_by_id(&NoteId::from(id))),
        NoteCommand::ExistsTitle { title } => found(session.store().exists_by_title(&title)),
        NoteCommand::FindId { title } => match session.store().find_id_by_title(&title) {
            Some(id) => {
                writeln!(out, "{id}")?;
                Ok(Outcome::Found)
            }
            None => Ok(Outcome::NotFound),
        },
    }
}

fn found(flag: bool) -> Result<Outcome, Box<dyn Error>> {
    Ok(if flag {
        Outcome::Found
    } else {
        Outcome::NotFound
    })
}
