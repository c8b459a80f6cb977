//! Bancario CLI - banking backend client in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use bancario_core::services::logging::TRANSACTION_ENTITY;
use bancario_core::services::LogEvent;
use commands::operations::Operation;
use commands::{accounts, auth, branches, clients, config, employees, logs, operations, transactions, users};

/// Environment variable holding the tracing filter (`debug`, `bancario_core=debug`...)
const LOG_FILTER_ENV: &str = "BANCARIO_LOG";

const SESSION_EXPIRED_MESSAGE: &str = "session expired, please log in again";

/// bk - manage clients, accounts and money movements on the banking backend
#[derive(Parser)]
#[command(name = "bk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account on the backend and log in
    Register {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage bank accounts
    Accounts {
        #[command(subcommand)]
        command: accounts::AccountCommands,
    },

    /// Manage clients
    Clients {
        #[command(subcommand)]
        command: clients::ClientCommands,
    },

    /// Manage employees
    Employees {
        #[command(subcommand)]
        command: employees::EmployeeCommands,
    },

    /// Manage branches
    Branches {
        #[command(subcommand)]
        command: branches::BranchCommands,
    },

    /// Manage application users
    Users {
        #[command(subcommand)]
        command: users::UserCommands,
    },

    /// Browse transaction records
    Transactions {
        #[command(subcommand)]
        command: transactions::TransactionCommands,
    },

    /// Deposit into an account
    Deposit {
        account: String,
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Withdraw from an account
    Withdraw {
        account: String,
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Transfer between two accounts
    Transfer {
        from: String,
        to: String,
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Pay a service from an account
    Pay {
        account: String,
        amount: String,
        #[arg(long, short)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the local event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    /// Name recorded in the event log
    fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Register { .. } => "register",
            Commands::Logout => "logout",
            Commands::Whoami { .. } => "whoami",
            Commands::Accounts { .. } => "accounts",
            Commands::Clients { .. } => "clients",
            Commands::Employees { .. } => "employees",
            Commands::Branches { .. } => "branches",
            Commands::Users { .. } => "users",
            Commands::Transactions { .. } => "transactions",
            Commands::Deposit { .. } => "deposit",
            Commands::Withdraw { .. } => "withdraw",
            Commands::Transfer { .. } => "transfer",
            Commands::Pay { .. } => "pay",
            Commands::Config { .. } => "config",
            Commands::Logs { .. } => "logs",
        }
    }

    /// Record kind a command works on, for filtering the event log
    fn entity(&self) -> Option<&'static str> {
        match self {
            Commands::Login { .. }
            | Commands::Register { .. }
            | Commands::Logout
            | Commands::Whoami { .. } => Some("session"),
            Commands::Accounts { .. } => Some("account"),
            Commands::Clients { .. } => Some("client"),
            Commands::Employees { .. } => Some("employee"),
            Commands::Branches { .. } => Some("branch"),
            Commands::Users { .. } => Some("user"),
            Commands::Transactions { .. }
            | Commands::Deposit { .. }
            | Commands::Withdraw { .. }
            | Commands::Transfer { .. }
            | Commands::Pay { .. } => Some(TRANSACTION_ENTITY),
            Commands::Config { .. } | Commands::Logs { .. } => None,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let command_name = cli.command.name();
    let entity = cli.command.entity();
    let tag = |event: LogEvent| match entity {
        Some(entity) => event.with_entity(entity),
        None => event,
    };
    commands::log_event(tag(LogEvent::command_run(command_name)));

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let core_error = e.downcast_ref::<bancario_core::Error>();
            let message = match core_error {
                Some(err) if err.is_session_expired() => SESSION_EXPIRED_MESSAGE.to_string(),
                Some(err) => err.user_message(),
                None => format!("{:#}", e),
            };

            let event = match core_error {
                Some(err) if err.is_session_expired() => {
                    LogEvent::session_expired(command_name, err.user_message())
                }
                _ => LogEvent::command_failed(command_name, message.clone()),
            };
            commands::log_event(tag(event));

            output::error(&message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { username, json } => auth::login(username, json).await,
        Commands::Register {
            first_name,
            last_name,
            username,
            json,
        } => auth::register(first_name, last_name, username, json).await,
        Commands::Logout => auth::logout(),
        Commands::Whoami { json } => auth::whoami(json),
        Commands::Accounts { command } => accounts::run(command).await,
        Commands::Clients { command } => clients::run(command).await,
        Commands::Employees { command } => employees::run(command).await,
        Commands::Branches { command } => branches::run(command).await,
        Commands::Users { command } => users::run(command).await,
        Commands::Transactions { command } => transactions::run(command).await,
        Commands::Deposit {
            account,
            amount,
            description,
            json,
        } => operations::run(Operation::Deposit { account }, &amount, description, json).await,
        Commands::Withdraw {
            account,
            amount,
            description,
            json,
        } => operations::run(Operation::Withdraw { account }, &amount, description, json).await,
        Commands::Transfer {
            from,
            to,
            amount,
            description,
            json,
        } => operations::run(Operation::Transfer { from, to }, &amount, description, json).await,
        Commands::Pay {
            account,
            amount,
            description,
            json,
        } => operations::run(Operation::Pay { account }, &amount, description, json).await,
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
