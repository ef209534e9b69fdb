// charsheet CLI - headless access to list files, settings and libraries

mod exit_codes;
mod keys;
mod library;
mod lists;
mod refs;
mod render;

use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

use charsheet_config::{ConfigError, SettingsContext};
use charsheet_core::{ItemVariant, TableError};
use charsheet_io::DocumentError;

use exit_codes::{EXIT_ERROR, EXIT_IO, EXIT_PARSE, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "csheet")]
#[command(about = "Character sheet lists and settings (CLI mode, headless)")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Settings directory (defaults to the platform config directory)
    #[arg(long, global = true, env = "CSHEET_CONFIG_DIR", value_name = "DIR")]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a list or character file as a table
    #[command(after_help = "\
Examples:
  csheet show Basic.skl
  csheet show Basic.skl --sheet --open
  csheet show reginald.gcs")]
    Show {
        file: PathBuf,

        /// Use the character sheet columns instead of the list editor's
        #[arg(long)]
        sheet: bool,

        /// Open every container row
        #[arg(long)]
        open: bool,
    },

    /// Search every column of every row, including closed containers
    #[command(after_help = "\
Examples:
  csheet find Equipment.eqp sword
  csheet find Equipment.eqp sword --next 2

Exits with 6 when nothing matches.")]
    Find {
        file: PathBuf,

        query: String,

        /// Step forward this many matches (stops at the last)
        #[arg(long, default_value_t = 0)]
        next: usize,

        /// Then step back this many matches (stops at the first)
        #[arg(long, default_value_t = 0)]
        previous: usize,
    },

    /// Create an empty list or character file; the kind follows the extension
    New {
        file: PathBuf,

        /// Character name (character files only)
        #[arg(long, default_value = "")]
        name: String,
    },

    /// Append a new row to a list file
    Add {
        file: PathBuf,

        #[arg(long, value_enum, default_value_t = VariantArg::Item)]
        variant: VariantArg,

        /// Put the row inside this top-level row (1-based)
        #[arg(long, value_name = "ROW")]
        into: Option<usize>,
    },

    /// Page references: book code to PDF mappings
    #[command(subcommand)]
    Ref(RefCommands),

    /// Key bindings
    #[command(subcommand)]
    Keys(KeyCommands),

    /// Print the tree of list files under a directory
    Library { dir: PathBuf },

    /// Recently opened files
    Recent {
        /// Forget every entry
        #[arg(long)]
        clear: bool,

        /// Forget entries whose file is gone
        #[arg(long, conflicts_with = "clear")]
        prune: bool,
    },
}

#[derive(Subcommand)]
enum RefCommands {
    /// Resolve a reference cell (e.g. "B22, MA105") to a PDF and page index
    Resolve { reference: String },

    /// Map a book code to its PDF
    Set {
        book: String,

        pdf: PathBuf,

        /// Added to printed page numbers to get PDF pages
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,
    },

    /// Forget a book mapping
    Remove { book: String },

    /// Show every mapping
    List,
}

#[derive(Subcommand)]
enum KeyCommands {
    /// Show every action and its chord
    List {
        /// Only actions changed from the built-in binding
        #[arg(long)]
        modified: bool,
    },

    /// Bind an action to a chord, e.g. "Ctrl+Shift+S"
    Set { action: String, chord: String },

    /// Leave an action with no chord
    Unbind { action: String },

    /// Restore the built-in chord for one action, or for all
    Reset { action: Option<String> },

    /// Show chords bound to more than one action
    Conflicts,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VariantArg {
    Item,
    Container,
    /// Technique for skills, ritual magic spell for spells
    Alternate,
}

impl From<VariantArg> for ItemVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Item => ItemVariant::Item,
            VariantArg::Container => ItemVariant::Container,
            VariantArg::Alternate => ItemVariant::Alternate,
        }
    }
}

/// Crate version plus the newest list file format this build reads
fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), "\nformat:  ", "1")
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };
    let config = ConfigBuilder::new()
        .set_time_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    // A second logger (tests running in-process) is harmless
    let _ = TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto);
}

fn load_settings(dir: Option<PathBuf>) -> SettingsContext {
    let (ctx, errors) = match dir {
        Some(dir) => SettingsContext::load(&dir),
        None => SettingsContext::load_default(),
    };
    if !errors.is_empty() {
        log::info!("{} settings file(s) ignored", errors.len());
    }
    ctx
}

/// Refuse to change a settings kind whose file failed to load, since the
/// change could not be saved without losing the file.
pub fn ensure_loaded(ctx: &SettingsContext, file_name: &str) -> Result<(), CliError> {
    if ctx.load_failed(file_name) {
        let path = ctx.path(file_name);
        return Err(CliError::new(EXIT_PARSE, format!("{} failed to load; leaving it unchanged", path.display()))
            .with_hint(format!("fix or remove {}", path.display())));
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    let mut ctx = load_settings(cli.config_dir);

    let result = match cli.command {
        Commands::Show { file, sheet, open } => lists::cmd_show(&mut ctx, &file, sheet, open),
        Commands::Find { file, query, next, previous } => lists::cmd_find(&file, &query, next, previous),
        Commands::New { file, name } => lists::cmd_new(&file, &name),
        Commands::Add { file, variant, into } => lists::cmd_add(&file, variant.into(), into),
        Commands::Ref(cmd) => match cmd {
            RefCommands::Resolve { reference } => refs::cmd_resolve(&ctx, &reference),
            RefCommands::Set { book, pdf, offset } => refs::cmd_set(&mut ctx, &book, &pdf, offset),
            RefCommands::Remove { book } => refs::cmd_remove(&mut ctx, &book),
            RefCommands::List => refs::cmd_list(&ctx),
        },
        Commands::Keys(cmd) => match cmd {
            KeyCommands::List { modified } => keys::cmd_list(&ctx, modified),
            KeyCommands::Set { action, chord } => keys::cmd_set(&mut ctx, &action, &chord),
            KeyCommands::Unbind { action } => keys::cmd_unbind(&mut ctx, &action),
            KeyCommands::Reset { action } => keys::cmd_reset(&mut ctx, action.as_deref()),
            KeyCommands::Conflicts => keys::cmd_conflicts(&ctx),
        },
        Commands::Library { dir } => library::cmd_library(&dir),
        Commands::Recent { clear, prune } => library::cmd_recent(&mut ctx, clear, prune),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Exit with `code` and print nothing
    pub fn silent(code: u8) -> Self {
        Self::new(code, String::new())
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl From<DocumentError> for CliError {
    fn from(err: DocumentError) -> Self {
        let code = match err {
            DocumentError::Io { .. } => EXIT_IO,
            DocumentError::Encode(_) => EXIT_ERROR,
            _ => EXIT_PARSE,
        };
        Self::new(code, err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let code = match err {
            ConfigError::Io { .. } => EXIT_IO,
            ConfigError::Parse { .. } => EXIT_PARSE,
            ConfigError::Encode(_) => EXIT_ERROR,
            ConfigError::UnknownKey(_) | ConfigError::InvalidValue { .. } => EXIT_USAGE,
        };
        Self::new(code, err.to_string())
    }
}

impl From<TableError> for CliError {
    fn from(err: TableError) -> Self {
        Self::args(err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}
