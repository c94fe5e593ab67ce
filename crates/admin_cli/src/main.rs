use std::{error::Error, io::Write};

use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "fintrack_admin")]
#[command(about = "Admin utilities for Fintrack (bootstrap users, run recurring transactions)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./fintrack.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Recurring(Recurring),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Recurring {
    #[command(subcommand)]
    command: RecurringCommand,
}

#[derive(Subcommand, Debug)]
enum RecurringCommand {
    /// Materialize every template due by `--date` (default: today, UTC).
    Run(RecurringRunArgs),
}

#[derive(Args, Debug)]
struct RecurringRunArgs {
    #[arg(long)]
    date: Option<NaiveDate>,
}

type CliResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const MIN_PASSWORD_LEN: usize = 8;
const PASSWORD_ATTEMPTS: usize = 3;

/// Keeps the terminal in raw mode while a password is typed.
struct RawTerminal;

impl RawTerminal {
    fn enter() -> CliResult<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Print `line` on a cleared line of stderr.
fn notice(out: &mut impl Write, line: &str) -> CliResult<()> {
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(line)
    )?;
    out.flush()?;
    Ok(())
}

/// Read one line without echoing it, masking every typed char with `*`.
fn read_hidden(prompt: &str) -> CliResult<String> {
    let _raw = RawTerminal::enter()?;
    let mut out = std::io::stderr();
    notice(&mut out, prompt)?;

    let mut secret = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };
        let control = modifiers.contains(KeyModifiers::CONTROL);

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                break;
            }
            KeyCode::Char('c') if control => {
                execute!(out, Print("\r\n"))?;
                return Err("interrupted".into());
            }
            KeyCode::Backspace if secret.pop().is_some() => {
                execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
            }
            KeyCode::Char(ch) if !control => {
                secret.push(ch);
                execute!(out, Print("*"))?;
            }
            _ => continue,
        }
        out.flush()?;
    }

    Ok(secret)
}

/// Ask for a new password and its confirmation.
fn read_new_password() -> CliResult<String> {
    let mut out = std::io::stderr();
    for _ in 0..PASSWORD_ATTEMPTS {
        let password = read_hidden("Password: ")?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            notice(
                &mut out,
                &format!("Password must be at least {MIN_PASSWORD_LEN} characters.\r\n"),
            )?;
            continue;
        }

        if read_hidden("Confirm password: ")? == password {
            return Ok(password);
        }
        notice(&mut out, "Passwords do not match. Try again.\r\n")?;
    }

    Err("too many attempts".into())
}

async fn connect_db(database_url: &str) -> CliResult<DatabaseConnection> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = read_new_password()?;

            match engine.register(&args.username, &args.email, &password).await {
                Ok(user) => println!("created user: {} ({})", user.username, user.id),
                Err(EngineError::ExistingKey(key)) => {
                    eprintln!("already taken: {key}");
                    std::process::exit(1);
                }
                Err(EngineError::Validation(errors)) => {
                    for err in errors {
                        eprintln!("{err}");
                    }
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Recurring(Recurring {
            command: RecurringCommand::Run(args),
        }) => {
            let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
            let report = engine.run_due_recurring(date).await?;
            println!(
                "{}: processed {}, created {}, failed {}",
                report.date, report.processed, report.created, report.failed
            );
            if report.failed > 0 {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
