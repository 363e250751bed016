use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use tracing_subscriber::EnvFilter;
use url::Url;

use services::catalog::write_index;
use services::{CatalogService, CatalogSource, Clock, SessionWorkflow};
use storage::repository::KeyValueStore;
use storage::sqlite::SqliteKeyValueStore;
use storage::{HistoryStore, SessionStore};
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDataSource { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDataSource { raw } => write!(f, "invalid --data value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    catalog: Arc<CatalogService>,
    session_workflow: Arc<SessionWorkflow>,
}

impl UiApp for DesktopApp {
    fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    fn session_workflow(&self) -> Arc<SessionWorkflow> {
        Arc::clone(&self.session_workflow)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--db <sqlite_url>] [--data <dir-or-url>]");
    eprintln!("  cargo run -p app -- index [--sets <dir>] [--out <file>]");
    eprintln!();
    eprintln!("Defaults for ui:");
    eprintln!("  --db sqlite:omnimock.sqlite3");
    eprintln!("  --data data");
    eprintln!();
    eprintln!("Defaults for index:");
    eprintln!("  --sets data/sets");
    eprintln!("  --out data/sets-index.json");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  OMNI_DB_URL, OMNI_DATA_DIR");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Index,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "index" => Some(Self::Index),
            _ => None,
        }
    }
}

struct UiArgs {
    db_url: String,
    data: CatalogSource,
}

impl UiArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("OMNI_DB_URL")
            .ok()
            .map_or_else(|| "sqlite://omnimock.sqlite3".into(), normalize_sqlite_url);
        let mut data_raw = std::env::var("OMNI_DATA_DIR").unwrap_or_else(|_| "data".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--data" => {
                    let value = require_value(args, "--data")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDataSource { raw: value });
                    }
                    data_raw = value;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let data = resolve_data_source(&data_raw)?;
        Ok(Self { db_url, data })
    }
}

struct IndexArgs {
    sets_dir: PathBuf,
    out_file: PathBuf,
}

impl IndexArgs {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut sets_dir = PathBuf::from("data/sets");
        let mut out_file = PathBuf::from("data/sets-index.json");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--sets" => sets_dir = PathBuf::from(require_value(args, "--sets")?),
                "--out" => out_file = PathBuf::from(require_value(args, "--out")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { sets_dir, out_file })
    }
}

fn resolve_data_source(raw: &str) -> Result<CatalogSource, ArgsError> {
    if raw.starts_with("http://") || raw.starts_with("https://") {
        // Relative segments resolve under the base only with a trailing slash.
        let mut base = raw.to_owned();
        if !base.ends_with('/') {
            base.push('/');
        }
        let url = Url::parse(&base).map_err(|_| ArgsError::InvalidDataSource {
            raw: raw.to_owned(),
        })?;
        Ok(CatalogSource::Remote(url))
    } else {
        Ok(CatalogSource::Directory(PathBuf::from(raw)))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }
    let mut iter = argv.into_iter();

    match cmd {
        Command::Index => {
            let parsed = IndexArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;
            let count = write_index(&parsed.sets_dir, &parsed.out_file)?;
            tracing::info!(
                sets = count,
                out = %parsed.out_file.display(),
                "catalog index generated"
            );
            Ok(())
        }
        Command::Ui => {
            let parsed = UiArgs::parse(&mut iter).map_err(|e| {
                eprintln!("{e}");
                print_usage();
                e
            })?;

            // Open + migrate SQLite at startup. Keep this in the binary glue
            // so core/services stay pure.
            prepare_sqlite_file(&parsed.db_url)?;
            let store = SqliteKeyValueStore::connect(&parsed.db_url).await?;
            store.migrate().await?;
            let kv: Arc<dyn KeyValueStore> = Arc::new(store);

            let clock = Clock::default_clock();
            let session_workflow = Arc::new(SessionWorkflow::new(
                clock,
                SessionStore::new(Arc::clone(&kv)),
                HistoryStore::new(kv),
            ));
            let catalog = Arc::new(CatalogService::new(parsed.data));

            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                catalog,
                session_workflow,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("OmniMock")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
