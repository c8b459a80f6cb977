//! Transactions command - browse, filter and summarize transaction records
//!
//! Money movement lives in the deposit/withdraw/transfer/pay commands; this
//! one only reads and maintains the records.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use colored::Colorize;
use dialoguer::Confirm;

use bancario_core::domain::{TransactionQuery, TransactionUpdate};
use bancario_core::{Transaction, TransactionFilter, TransactionKind, TransactionStatistics};

use super::{get_context, parse_amount, print_json, require_login};
use crate::output;

/// Server paging plus the local filters
#[derive(Args)]
pub struct ListArgs {
    /// DEPOSITO, RETIRO, TRANSFERENCIA or PAGO_SERVICIO
    #[arg(long = "type")]
    kind: Option<TransactionKind>,
    /// Keep transactions whose source account id contains this text
    #[arg(long)]
    account: Option<String>,
    /// First day included (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
    #[arg(long, default_value = "0")]
    skip: u32,
    #[arg(long)]
    limit: Option<u32>,
}

impl ListArgs {
    fn query(&self, default_limit: u32) -> TransactionQuery {
        TransactionQuery {
            skip: self.skip,
            limit: self.limit.unwrap_or(default_limit),
            kind: self.kind,
        }
    }

    fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            kind: self.kind,
            account_id: self.account.clone(),
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Subcommand)]
pub enum TransactionCommands {
    /// List transactions
    List {
        #[command(flatten)]
        args: ListArgs,
        /// Print summary figures below the table
        #[arg(long)]
        stats: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summary figures only
    Stats {
        #[command(flatten)]
        args: ListArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one transaction
    Get {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Transactions of one account
    ByAccount {
        account_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a transaction record (balances are not touched)
    Update {
        id: String,
        #[arg(long = "type")]
        kind: Option<TransactionKind>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a transaction record (balances are not touched)
    Delete {
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

pub async fn run(command: TransactionCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        TransactionCommands::List { args, stats, json } => {
            let fetched = ctx.transactions.list_query(&args.query(ctx.config.page_size)).await?;
            let shown = args.filter().apply_owned(&fetched);

            if json {
                if stats {
                    return print_json(&serde_json::json!({
                        "transactions": shown,
                        "statistics": TransactionStatistics::from_transactions(&shown),
                    }));
                }
                return print_json(&shown);
            }

            print_transactions(&shown);
            if shown.len() != fetched.len() {
                println!(
                    "{}",
                    format!("{} of {} fetched transaction(s) match", shown.len(), fetched.len()).dimmed()
                );
            }
            if stats {
                println!();
                print_statistics(&TransactionStatistics::from_transactions(&shown));
            }
        }
        TransactionCommands::Stats { args, json } => {
            let fetched = ctx.transactions.list_query(&args.query(ctx.config.page_size)).await?;
            let stats = TransactionStatistics::from_transactions(&args.filter().apply_owned(&fetched));
            if json {
                return print_json(&stats);
            }
            print_statistics(&stats);
        }
        TransactionCommands::Get { id, json } => {
            let tx = ctx.transactions.get(&id).await?;
            if json {
                return print_json(&tx);
            }
            println!("{}", format!("Transaction {}", tx.id).bold());
            println!("  Type: {}", tx.kind);
            println!("  Amount: {}", output::format_amount(tx.amount));
            println!("  Account: {}", tx.account_id);
            if let Some(dest) = &tx.destination_account_id {
                println!("  Destination: {}", dest);
            }
            println!("  Date: {}", format_date(&tx));
            println!("  Description: {}", output::or_dash(tx.description.as_deref()));
        }
        TransactionCommands::ByAccount { account_id, json } => {
            let list = ctx.transactions.by_account(&account_id).await?;
            if json {
                return print_json(&list);
            }
            print_transactions(&list);
        }
        TransactionCommands::Update {
            id,
            kind,
            amount,
            account_id,
            description,
            json,
        } => {
            require_login(&ctx)?;
            let changes = TransactionUpdate {
                kind,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                account_id,
                description,
            };
            let tx = ctx.transactions.update(&id, &changes).await?;
            if json {
                return print_json(&tx);
            }
            output::success(&format!("Transaction {} updated", tx.id));
            output::warning("Account balances were not adjusted");
        }
        TransactionCommands::Delete { id, force } => {
            require_login(&ctx)?;
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Delete transaction {}? Balances will not be adjusted.", id))
                    .default(false)
                    .interact()?
            {
                println!("{}", "Cancelled".dimmed());
                return Ok(());
            }
            ctx.transactions.delete(&id).await?;
            output::success(&format!("Transaction {} deleted", id));
        }
    }

    Ok(())
}

fn format_date(tx: &Transaction) -> String {
    tx.effective_date()
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions found.");
        return;
    }

    let mut table = output::create_table();
    table.set_header(vec!["ID", "Date", "Type", "Amount", "Account", "Destination", "Description"]);
    for tx in transactions {
        table.add_row(vec![
            tx.id.clone(),
            format_date(tx),
            tx.kind.to_string(),
            output::format_amount(tx.amount),
            tx.account_number.clone().unwrap_or_else(|| tx.account_id.clone()),
            output::or_dash(
                tx.destination_account_number
                    .as_deref()
                    .or(tx.destination_account_id.as_deref()),
            ),
            output::or_dash(tx.description.as_deref()),
        ]);
    }
    println!("{}", table);
}

fn print_statistics(stats: &TransactionStatistics) {
    println!("{}", "Transaction Statistics".bold());
    let mut table = output::create_table();
    table.add_row(vec!["Transactions".to_string(), stats.count.to_string()]);
    table.add_row(vec!["Deposits".to_string(), output::format_amount(stats.total_deposits)]);
    table.add_row(vec!["Withdrawals".to_string(), output::format_amount(stats.total_withdrawals)]);
    table.add_row(vec!["Transfers".to_string(), output::format_amount(stats.total_transfers)]);
    table.add_row(vec!["Net".to_string(), output::format_amount(stats.net_balance)]);
    table.add_row(vec!["Average".to_string(), output::format_amount(stats.average_amount)]);
    println!("{}", table);
}
