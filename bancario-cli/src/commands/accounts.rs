//! Accounts command - list, look up and maintain bank accounts

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use bancario_core::domain::{AccountCreate, AccountStatus, AccountType, AccountUpdate};
use bancario_core::{Account, Page};

use super::{get_context, parse_amount, print_json, require_login};
use crate::output;

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List accounts
    List {
        /// Keep accounts whose number, type or id contains this text
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "0")]
        skip: u32,
        /// Page size (defaults to api.pageSize)
        #[arg(long)]
        limit: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one account by id
    Get {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one account by account number
    ByNumber {
        number: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Open an account
    Create {
        #[arg(long)]
        number: String,
        #[arg(long)]
        client_id: String,
        /// AHORROS, CORRIENTE or PLAZO_FIJO
        #[arg(long = "type", default_value = "AHORROS")]
        account_type: AccountType,
        /// Opening balance
        #[arg(long, default_value = "0")]
        balance: String,
        /// ACTIVA, INACTIVA, BLOQUEADA or CERRADA
        #[arg(long)]
        status: Option<AccountStatus>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change account fields
    Update {
        id: String,
        #[arg(long)]
        number: Option<String>,
        #[arg(long)]
        balance: Option<String>,
        #[arg(long)]
        status: Option<AccountStatus>,
        #[arg(long = "type")]
        account_type: Option<AccountType>,
        #[arg(long)]
        client_id: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an account
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: AccountCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        AccountCommands::List {
            search,
            skip,
            limit,
            json,
        } => {
            let page = Page::new(skip, limit.unwrap_or(ctx.config.page_size));
            let accounts = match search {
                Some(term) => ctx.accounts.search(&term, page).await?,
                None => ctx.accounts.list(page).await?,
            };
            if json {
                return print_json(&accounts);
            }
            print_accounts(&accounts);
        }
        AccountCommands::Get { id, json } => {
            let account = ctx.accounts.get(&id).await?;
            show(&account, json)?;
        }
        AccountCommands::ByNumber { number, json } => {
            let account = ctx.accounts.get_by_number(&number).await?;
            show(&account, json)?;
        }
        AccountCommands::Create {
            number,
            client_id,
            account_type,
            balance,
            status,
            json,
        } => {
            require_login(&ctx)?;
            let mut input = AccountCreate::new(number, parse_amount(&balance)?, account_type, client_id);
            if let Some(status) = status {
                input.status = status;
            }
            let account = ctx.accounts.create(&input).await?;
            if json {
                return print_json(&account);
            }
            output::success(&format!("Account {} created (id {})", account.number, account.id));
        }
        AccountCommands::Update {
            id,
            number,
            balance,
            status,
            account_type,
            client_id,
            json,
        } => {
            require_login(&ctx)?;
            let changes = AccountUpdate {
                number,
                balance: balance.as_deref().map(parse_amount).transpose()?,
                status,
                account_type,
                client_id,
            };
            let account = ctx.accounts.update(&id, &changes).await?;
            if json {
                return print_json(&account);
            }
            output::success(&format!("Account {} updated", account.id));
        }
        AccountCommands::Delete { id, force } => {
            require_login(&ctx)?;
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete account {}?", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            ctx.accounts.delete(&id).await?;
            output::success(&format!("Account {} deleted", id));
        }
    }

    Ok(())
}

fn show(account: &Account, json: bool) -> Result<()> {
    if json {
        return print_json(account);
    }
    println!("{}", format!("Account {}", account.number).bold());
    println!("  ID: {}", account.id);
    println!("  Type: {}", account.account_type);
    println!("  Status: {}", output::format_status(account.status));
    println!("  Balance: {}", output::format_amount(account.balance));
    println!("  Client: {}", account.client_id);
    Ok(())
}

fn print_accounts(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts found.");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Number", "Type", "Status", "Balance", "Client"]);
    for account in accounts {
        table.add_row(vec![
            account.id.clone(),
            account.number.clone(),
            account.account_type.to_string(),
            output::format_status(account.status),
            output::format_amount(account.balance),
            account.client_id.clone(),
        ]);
    }
    println!("{}", table);
    println!("{}", format!("{} account(s)", accounts.len()).dimmed());
}
