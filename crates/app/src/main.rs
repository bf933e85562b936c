use std::fmt;
use std::sync::Arc;

use electro_core::model::{
    AdminCredentials, CourseId, LessonId, Progress, SiteConfig, SiteConfigDraft, Theme,
};
use electro_core::text::format_number;
use serde_json::Value;
use services::{AppServices, Clock, TracingObserver};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { command: &'static str, name: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
    InvalidTheme { raw: String },
    InvalidJson { raw: String },
    InvalidProgress { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { command, name } => {
                write!(f, "{command}: missing <{name}>")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidTheme { raw } => {
                write!(f, "invalid theme (expected show|toggle|light|dark): {raw}")
            }
            ArgsError::InvalidJson { raw } => write!(f, "value is not valid JSON: {raw}"),
            ArgsError::InvalidProgress { raw } => write!(f, "progress must be a number: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct AdminLoginFailed;

impl fmt::Display for AdminLoginFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("admin login failed")
    }
}

impl std::error::Error for AdminLoginFailed {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_arg(
    args: &mut impl Iterator<Item = String>,
    command: &'static str,
    name: &'static str,
) -> Result<String, ArgsError> {
    args.next()
        .ok_or(ArgsError::MissingArgument { command, name })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  electrolearn [--db <sqlite_url>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  whoami");
    eprintln!("  login <name> <email>");
    eprintln!("  logout");
    eprintln!("  theme [show|toggle|light|dark]");
    eprintln!("  pref get <key>");
    eprintln!("  pref set <key> <json>");
    eprintln!("  progress get <course> [lesson]");
    eprintln!("  progress set <course> <lesson> <value>");
    eprintln!("  admin login <email> <password>");
    eprintln!("  admin status");
    eprintln!("  admin logout");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:electrolearn.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ELECTROLEARN_DB_URL, ELECTROLEARN_ADMIN_EMAIL, ELECTROLEARN_ADMIN_PASSWORD,");
    eprintln!("  ELECTROLEARN_API_BASE_URL, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq)]
enum ThemeAction {
    Show,
    Toggle,
    Set(Theme),
}

#[derive(Debug, Clone, PartialEq)]
enum Command {
    WhoAmI,
    Login { name: String, email: String },
    Logout,
    Theme(ThemeAction),
    PrefGet { key: String },
    PrefSet { key: String, value: Value },
    ProgressGet { course: CourseId, lesson: Option<LessonId> },
    ProgressSet { course: CourseId, lesson: LessonId, value: f64 },
    AdminLogin { email: String, password: String },
    AdminStatus,
    AdminLogout,
}

impl Command {
    fn parse(first: &str, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let cmd = match first {
            "whoami" => Self::WhoAmI,
            "login" => Self::Login {
                name: require_arg(args, "login", "name")?,
                email: require_arg(args, "login", "email")?,
            },
            "logout" => Self::Logout,
            "theme" => Self::Theme(match args.next().as_deref() {
                None | Some("show") => ThemeAction::Show,
                Some("toggle") => ThemeAction::Toggle,
                Some(raw) => ThemeAction::Set(raw.parse().map_err(|_| ArgsError::InvalidTheme {
                    raw: raw.to_string(),
                })?),
            }),
            "pref" => match require_arg(args, "pref", "get|set")?.as_str() {
                "get" => Self::PrefGet {
                    key: require_arg(args, "pref get", "key")?,
                },
                "set" => {
                    let key = require_arg(args, "pref set", "key")?;
                    let raw = require_arg(args, "pref set", "json")?;
                    let value = serde_json::from_str(&raw)
                        .map_err(|_| ArgsError::InvalidJson { raw: raw.clone() })?;
                    Self::PrefSet { key, value }
                }
                other => return Err(ArgsError::UnknownCommand(format!("pref {other}"))),
            },
            "progress" => match require_arg(args, "progress", "get|set")?.as_str() {
                "get" => Self::ProgressGet {
                    course: CourseId::new(require_arg(args, "progress get", "course")?),
                    lesson: args.next().map(LessonId::new),
                },
                "set" => {
                    let course = CourseId::new(require_arg(args, "progress set", "course")?);
                    let lesson = LessonId::new(require_arg(args, "progress set", "lesson")?);
                    let raw = require_arg(args, "progress set", "value")?;
                    let value = raw
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .ok_or(ArgsError::InvalidProgress { raw })?;
                    Self::ProgressSet {
                        course,
                        lesson,
                        value,
                    }
                }
                other => return Err(ArgsError::UnknownCommand(format!("progress {other}"))),
            },
            "admin" => match require_arg(args, "admin", "login|status|logout")?.as_str() {
                "login" => Self::AdminLogin {
                    email: require_arg(args, "admin login", "email")?,
                    password: require_arg(args, "admin login", "password")?,
                },
                "status" => Self::AdminStatus,
                "logout" => Self::AdminLogout,
                other => return Err(ArgsError::UnknownCommand(format!("admin {other}"))),
            },
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        };

        if let Some(extra) = args.next() {
            return Err(ArgsError::UnknownArg(extra));
        }
        Ok(cmd)
    }
}

struct Args {
    db_url: String,
    command: Command,
}

impl Args {
    fn parse(argv: Vec<String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("ELECTROLEARN_DB_URL")
            .unwrap_or_else(|_| "sqlite:electrolearn.sqlite3".into());
        let mut args = argv.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--help" | "-h" => return Ok(None),
                flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                first => {
                    let command = Command::parse(first, &mut args)?;
                    return Ok(Some(Self {
                        db_url: normalize_sqlite_url(db_url),
                        command,
                    }));
                }
            }
        }

        Ok(Some(Self {
            db_url: normalize_sqlite_url(db_url),
            command: Command::WhoAmI,
        }))
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
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

// sqlx does not create missing database files by default.
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

fn site_config_from_env() -> Result<SiteConfig, Box<dyn std::error::Error>> {
    let draft = SiteConfigDraft {
        api_base_url: std::env::var("ELECTROLEARN_API_BASE_URL").ok(),
        admin_email: std::env::var("ELECTROLEARN_ADMIN_EMAIL").ok(),
        admin_password: std::env::var("ELECTROLEARN_ADMIN_PASSWORD").ok(),
        ..SiteConfigDraft::default()
    };
    Ok(draft.validate()?)
}

fn format_progress(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let whole = value as i64;
        return format_number(whole);
    }
    value.to_string()
}

async fn execute(app: &AppServices, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::WhoAmI => match app.auth().user_menu().await {
            Some(menu) => {
                println!("{} <{}>", menu.name, menu.email);
                for entry in &menu.entries {
                    println!("  - {}", entry.label);
                }
            }
            None => println!("not signed in"),
        },
        Command::Login { name, email } => {
            let session = app.auth().login(&name, &email).await?;
            println!("signed in as {}", session.name());
        }
        Command::Logout => {
            app.auth().logout().await;
            println!("signed out");
        }
        Command::Theme(ThemeAction::Show) => println!("{}", app.store().get_theme().await),
        Command::Theme(ThemeAction::Toggle) => {
            app.theme().toggle_theme().await;
            if let Some(toast) = app.notifications().current() {
                println!("{}", toast.message());
            }
        }
        Command::Theme(ThemeAction::Set(theme)) => {
            app.store().set_theme(theme).await;
            println!("{theme}");
        }
        Command::PrefGet { key } => {
            println!("{}", app.store().get_preference(&key, Value::Null).await);
        }
        Command::PrefSet { key, value } => app.store().set_preference(&key, value).await,
        Command::ProgressGet { course, lesson } => {
            match app.store().progress(&course, lesson.as_ref()).await {
                Progress::Lesson(value) => println!("{}", format_progress(value)),
                Progress::Course(lessons) if lessons.is_empty() => {
                    println!("no progress recorded for {course}");
                }
                Progress::Course(lessons) => {
                    for (lesson, value) in lessons.iter() {
                        println!("{lesson}\t{}", format_progress(value));
                    }
                }
            }
        }
        Command::ProgressSet {
            course,
            lesson,
            value,
        } => app.store().set_progress(&course, &lesson, value).await,
        Command::AdminLogin { email, password } => {
            let attempt = AdminCredentials::new(email, password);
            if app.auth().admin_login(&attempt).await.is_err() {
                return Err(AdminLoginFailed.into());
            }
            println!("admin signed in");
        }
        Command::AdminStatus => match app.auth().require_admin().await {
            Ok(()) => println!("admin"),
            Err(err) => println!("{err}"),
        },
        Command::AdminLogout => {
            app.auth().admin_logout().await;
            println!("admin signed out");
        }
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let Some(parsed) = Args::parse(argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?
    else {
        print_usage();
        return Ok(());
    };

    // Open + migrate SQLite here so core/services never touch the filesystem.
    prepare_sqlite_file(&parsed.db_url)?;
    tracing::debug!(db_url = %parsed.db_url, "opening local storage");
    let config = site_config_from_env()?;
    let app = AppServices::new_sqlite(
        &parsed.db_url,
        Clock::system(),
        config,
        Arc::new(TracingObserver),
    )
    .await?;
    app.initialize().await;

    execute(&app, parsed.command).await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
