use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use taskboard::config::{ClientConfig, ConfigError};
use taskboard::error::ApiError;
use taskboard::net::types::{Board, NewTask, Session, Task, TaskStatus, TaskUpdate};
use taskboard::net::{ApiClient, ReqwestTransport};
use taskboard::state::{AuthStore, BoardStore, OpenOutcome, Route, guard, route_after_delete, validate_name};
use taskboard::storage::FileStore;

type Api = ApiClient<Arc<ReqwestTransport>>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Http(#[from] ApiError),
    #[error("not logged in; run `taskboard login` first")]
    NotLoggedIn,
    #[error("{0}")]
    Store(String),
    #[error("{0} must not be blank")]
    Blank(&'static str),
    #[error("nothing to update; pass at least one field")]
    EmptyUpdate,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "taskboard", about = "Task board API client")]
struct Cli {
    /// Server origin; overrides `TASKBOARD_BASE_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Session file; overrides `TASKBOARD_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Print raw JSON instead of text.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Signup {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    Logout,
    Whoami,
    Board(BoardCommand),
    Task(TaskCommand),
}

#[derive(Args, Debug)]
struct BoardCommand {
    #[command(subcommand)]
    command: BoardSubcommand,
}

#[derive(Subcommand, Debug)]
enum BoardSubcommand {
    List,
    /// Open a board the way the board page does, creating a starter board if none exist.
    Open {
        board_id: Option<String>,
    },
    Show {
        board_id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        board_id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Delete {
        board_id: String,
    },
}

#[derive(Args, Debug)]
struct TaskCommand {
    #[command(subcommand)]
    command: TaskSubcommand,
}

#[derive(Subcommand, Debug)]
enum TaskSubcommand {
    Create {
        #[arg(long = "board")]
        board_id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = TaskStatus::InProgress)]
        status: TaskStatus,
        #[arg(long, default_value = "")]
        icon: String,
    },
    Update {
        task_id: String,
        /// Load this board first so the result shows the merged task.
        #[arg(long = "board")]
        board_id: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<TaskStatus>,
        #[arg(long)]
        icon: Option<String>,
    },
    Delete {
        task_id: String,
        #[arg(long = "board")]
        board_id: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config = ClientConfig::new(base_url, config.api_prefix, config.session_file, config.timeouts);
    }
    if let Some(path) = cli.session_file {
        config.session_file = Some(path);
    }

    let transport = Arc::new(ReqwestTransport::new(&config.base_url, config.timeouts)?);
    let api: Api = ApiClient::new(transport, &config.api_prefix);
    let storage = FileStore::new(config.session_path()?);
    let mut auth = AuthStore::new(api.clone(), storage);

    match cli.command {
        Command::Login { email, password } => {
            if !auth.login(&email, &password).await {
                return Err(store_error(auth.error(), "Login failed"));
            }
            let username = auth.user().map_or("", |u| u.username.as_str());
            println!("logged in as {username}");
            Ok(())
        }
        Command::Signup { username, email, password } => {
            if !auth.signup(&username, &email, &password).await {
                return Err(store_error(auth.error(), "Signup failed"));
            }
            println!("account created; run `taskboard login` to sign in");
            Ok(())
        }
        Command::Logout => {
            auth.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            match auth.session() {
                Some(session) => println!("{} (id {})", session.username(), session.user_id()),
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::Board(board) => {
            let session = require_session(auth.session())?;
            run_board(api, &session, board, cli.json).await
        }
        Command::Task(task) => {
            let session = require_session(auth.session())?;
            run_task(api, &session, task, cli.json).await
        }
    }
}

fn require_session(session: Option<&Session>) -> Result<Session, CliError> {
    match guard(Route::Board(None), session.is_some()) {
        Route::Login => Err(CliError::NotLoggedIn),
        _ => session.cloned().ok_or(CliError::NotLoggedIn),
    }
}

fn store_error(error: Option<&str>, fallback: &str) -> CliError {
    CliError::Store(error.unwrap_or(fallback).to_owned())
}

// =============================================================================
// BOARDS
// =============================================================================

async fn run_board(api: Api, session: &Session, board: BoardCommand, json: bool) -> Result<(), CliError> {
    let mut store = BoardStore::new(api);
    match board.command {
        BoardSubcommand::List => {
            if !store.get_all_boards(session).await {
                return Err(store_error(store.error(), "Failed to fetch boards"));
            }
            if json {
                return print_json(&store.boards());
            }
            for board in store.boards() {
                print_board_line(board);
            }
            Ok(())
        }
        BoardSubcommand::Open { board_id } => {
            let mut requested = board_id;
            loop {
                match store.open(session, requested.as_deref()).await {
                    OpenOutcome::Loaded => return print_board(&store, json),
                    OpenOutcome::Redirect(Route::Board(Some(next))) => {
                        eprintln!("opening {}", Route::Board(Some(next.clone())).path());
                        requested = Some(next);
                    }
                    OpenOutcome::Redirect(_) | OpenOutcome::Failed => {
                        return Err(store_error(store.error(), "Failed to fetch board"));
                    }
                }
            }
        }
        BoardSubcommand::Show { board_id } => {
            if !store.get_board(session, &board_id).await {
                return Err(store_error(store.error(), "Failed to fetch board"));
            }
            print_board(&store, json)
        }
        BoardSubcommand::Create { name, description } => {
            let name = validate_name(&name).ok_or(CliError::Blank("board name"))?;
            let Some(id) = store.create_board(session, name, &description).await else {
                return Err(store_error(store.error(), "Failed to create board"));
            };
            println!("{id}");
            Ok(())
        }
        BoardSubcommand::Update { board_id, name, description } => {
            let name = validate_name(&name).ok_or(CliError::Blank("board name"))?;
            if !store.update_board(session, &board_id, name, &description).await {
                return Err(store_error(store.error(), "Failed to update board"));
            }
            println!("updated {board_id}");
            Ok(())
        }
        BoardSubcommand::Delete { board_id } => {
            // Refresh first so we can say where the board page would land next.
            let listed = store.get_all_boards(session).await;
            if !store.delete_board(session, &board_id).await {
                return Err(store_error(store.error(), "Failed to delete board"));
            }
            println!("deleted {board_id}");
            if listed {
                println!("next: {}", route_after_delete(store.boards(), &board_id).path());
            }
            Ok(())
        }
    }
}

// =============================================================================
// TASKS
// =============================================================================

async fn run_task(api: Api, session: &Session, task: TaskCommand, json: bool) -> Result<(), CliError> {
    let mut store = BoardStore::new(api);
    match task.command {
        TaskSubcommand::Create { board_id, name, description, status, icon } => {
            let name = validate_name(&name).ok_or(CliError::Blank("task name"))?;
            let new_task = NewTask { name: name.to_owned(), description, status, icon, board_id };
            let Some(id) = store.create_task(session, new_task).await else {
                return Err(store_error(store.error(), "Failed to create task"));
            };
            println!("{id}");
            Ok(())
        }
        TaskSubcommand::Update { task_id, board_id, name, description, status, icon } => {
            let name = match name {
                Some(name) => Some(validate_name(&name).ok_or(CliError::Blank("task name"))?.to_owned()),
                None => None,
            };
            let update = TaskUpdate { name, description, status, icon };
            if update.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            if let Some(board_id) = &board_id {
                if !store.get_board(session, board_id).await {
                    return Err(store_error(store.error(), "Failed to fetch board"));
                }
            }
            if !store.update_task(session, &task_id, &update).await {
                return Err(store_error(store.error(), "Failed to update task"));
            }
            match store.tasks().iter().find(|t| t.id == task_id) {
                Some(task) if json => print_json(task),
                Some(task) => {
                    print_task_line(task);
                    Ok(())
                }
                None => {
                    println!("updated {task_id}");
                    Ok(())
                }
            }
        }
        TaskSubcommand::Delete { task_id, board_id } => {
            if let Some(board_id) = &board_id {
                if !store.get_board(session, board_id).await {
                    return Err(store_error(store.error(), "Failed to fetch board"));
                }
            }
            if !store.delete_task(session, &task_id).await {
                return Err(store_error(store.error(), "Failed to delete task"));
            }
            println!("deleted {task_id}");
            if board_id.is_some() {
                println!("{} tasks remain", store.tasks().len());
            }
            Ok(())
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_board(store: &BoardStore<Arc<ReqwestTransport>>, json: bool) -> Result<(), CliError> {
    let Some(board) = store.board() else {
        return Err(CliError::Store("no board loaded".to_owned()));
    };
    if json {
        return print_json(&serde_json::json!({ "board": board, "tasks": store.tasks() }));
    }

    print_board_line(board);
    if !board.description.is_empty() {
        println!("  {}", board.description);
    }
    for (status, tasks) in store.columns().iter() {
        println!();
        println!("{} ({})", status_heading(status), tasks.len());
        for task in tasks {
            print_task_line(task);
        }
    }
    Ok(())
}

fn status_heading(status: TaskStatus) -> String {
    format!("== {} [{}]", status.label(), status.color())
}

fn print_board_line(board: &Board) {
    println!("{}  {}", board.id, board.name);
}

fn print_task_line(task: &Task) {
    let icon = if task.icon.is_empty() { "-" } else { task.icon.as_str() };
    println!("  {icon} {}  {}  [{}]", task.id, task.name, task.status);
    if !task.description.is_empty() {
        println!("      {}", task.description);
    }
}

fn print_json(value: &impl serde::Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
