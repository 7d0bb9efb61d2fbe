use std::fmt;
use std::path::PathBuf;

use quiz_core::model::SessionId;
use services::{Clock, QuizConfig, QuizLoopService, QuizServices};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

const MEMORY_BACKEND: &str = "memory";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSessionId { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSessionId { raw } => write!(f, "invalid --session value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url|memory>] [--bank <path>]");
    eprintln!("                      [--session <id>] [--welcome <text>]");
    eprintln!();
    eprintln!("Type answers on stdin, one per line. Commands:");
    eprintln!("  /restart   drop the quiz in progress");
    eprintln!("  /progress  show answered and correct counts");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db memory, --session 1, built-in Python question bank");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_BANK, QUIZ_SESSION_ID, QUIZ_WELCOME, RUST_LOG");
}

struct Args {
    db_url: String,
    bank: Option<PathBuf>,
    session_id: SessionId,
    welcome: Option<String>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| MEMORY_BACKEND.into(), normalize_db_url);
        let mut bank = std::env::var_os("QUIZ_BANK").map(PathBuf::from);
        let mut session_id = std::env::var("QUIZ_SESSION_ID")
            .ok()
            .and_then(|value| value.parse::<SessionId>().ok())
            .unwrap_or_else(|| SessionId::new(1));
        let mut welcome = std::env::var("QUIZ_WELCOME").ok();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_db_url(value);
                }
                "--bank" => bank = Some(PathBuf::from(require_value(args, "--bank")?)),
                "--session" => {
                    let value = require_value(args, "--session")?;
                    session_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidSessionId { raw: value.clone() })?;
                }
                "--welcome" => welcome = Some(require_value(args, "--welcome")?),
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self {
            db_url,
            bank,
            session_id,
            welcome,
        }))
    }
}

fn normalize_db_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == MEMORY_BACKEND || trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://")
    {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
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

fn load_config(args: &Args) -> Result<QuizConfig, Box<dyn std::error::Error>> {
    let config = match &args.bank {
        Some(path) => QuizConfig::from_path(path)?,
        None => QuizConfig::builtin()?,
    };
    Ok(match &args.welcome {
        Some(text) => config.with_welcome_message(text.clone()),
        None => config,
    })
}

async fn build_services(
    args: &Args,
    config: QuizConfig,
) -> Result<QuizServices, Box<dyn std::error::Error>> {
    let clock = Clock::system();
    if args.db_url == MEMORY_BACKEND {
        return Ok(QuizServices::in_memory(clock, config));
    }
    prepare_sqlite_file(&args.db_url)?;
    Ok(QuizServices::new_sqlite(&args.db_url, clock, config).await?)
}

/// Replies for one stdin line, including the transport-level commands.
async fn dispatch(
    quiz: &QuizLoopService,
    id: SessionId,
    line: &str,
) -> Result<Vec<String>, Box<dyn std::error::Error>> {
    match line.trim() {
        "/restart" => {
            quiz.restart(id).await?;
            Ok(vec!["Quiz reset. Send any message to start again.".to_owned()])
        }
        "/progress" => {
            let p = quiz.progress(id).await?;
            Ok(vec![format!(
                "Answered {} of {} questions ({} correct).",
                p.answered, p.total, p.correct
            )])
        }
        _ => Ok(quiz.handle_message(id, line).await?),
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let parsed = match Args::parse(&mut argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}");
            print_usage();
            return Err(e.into());
        }
    };

    let config = load_config(&parsed)?;
    let services = build_services(&parsed, config).await?;
    let quiz = services.quiz_loop();
    tracing::info!(
        session = %parsed.session_id,
        db = %parsed.db_url,
        questions = quiz.config().bank().len(),
        "quiz ready"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    while let Some(line) = lines.next_line().await? {
        for reply in dispatch(&quiz, parsed.session_id, &line).await? {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n\n").await?;
        }
        stdout.flush().await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_backend_is_kept_as_is() {
        assert_eq!(normalize_db_url(" memory ".into()), MEMORY_BACKEND);
        assert_eq!(normalize_db_url("sqlite::memory:".into()), "sqlite::memory:");
    }

    #[test]
    fn defaults_select_memory_backend() {
        let mut argv = Vec::<String>::new().into_iter();
        let args = Args::parse(&mut argv).unwrap().unwrap();
        if std::env::var_os("QUIZ_DB_URL").is_none() {
            assert_eq!(args.db_url, MEMORY_BACKEND);
        }
    }

    #[test]
    fn relative_sqlite_path_becomes_absolute_url() {
        let url = normalize_db_url("sqlite:quiz.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("quiz.sqlite3"));
    }
}
