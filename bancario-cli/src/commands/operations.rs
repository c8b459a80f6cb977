//! Deposit, withdraw, transfer and pay commands
//!
//! Each runs the two-step operation (record, then balance). A partial
//! failure is reported as a warning and the command still exits 0; every
//! outcome goes to the event log with the stage it reached.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

use bancario_core::services::LogEvent;
use bancario_core::{Error, OperationOutcome};

use super::{get_context, log_event, parse_amount, print_json, require_login};
use crate::output;

pub enum Operation {
    Deposit { account: String },
    Withdraw { account: String },
    Transfer { from: String, to: String },
    Pay { account: String },
}

impl Operation {
    fn command(&self) -> &'static str {
        match self {
            Operation::Deposit { .. } => "deposit",
            Operation::Withdraw { .. } => "withdraw",
            Operation::Transfer { .. } => "transfer",
            Operation::Pay { .. } => "pay",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Operation::Deposit { .. } => "Deposit",
            Operation::Withdraw { .. } => "Withdrawal",
            Operation::Transfer { .. } => "Transfer",
            Operation::Pay { .. } => "Service payment",
        }
    }
}

fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

async fn with_spinner<F>(message: &str, enabled: bool, fut: F) -> Result<OperationOutcome, Error>
where
    F: Future<Output = Result<OperationOutcome, Error>>,
{
    let bar = spinner(message, enabled);
    let result = fut.await;
    bar.finish_and_clear();
    result
}

pub async fn run(op: Operation, amount: &str, description: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_login(&ctx)?;
    let amount = parse_amount(amount)?;
    let description = description.as_deref();
    let show_spinner = !json && atty::is(atty::Stream::Stderr);
    let message = format!("{} of {}...", op.label(), output::format_amount(amount));

    let result = match &op {
        Operation::Deposit { account } => {
            with_spinner(&message, show_spinner, ctx.operations.deposit(account, amount, description)).await
        }
        Operation::Withdraw { account } => {
            with_spinner(&message, show_spinner, ctx.operations.withdraw(account, amount, description)).await
        }
        Operation::Transfer { from, to } => {
            with_spinner(&message, show_spinner, ctx.operations.transfer(from, to, amount, description))
                .await
        }
        Operation::Pay { account } => {
            with_spinner(&message, show_spinner, ctx.operations.pay_service(account, amount, description))
                .await
        }
    };

    let outcome = match result {
        Ok(outcome) => {
            log_event(LogEvent::operation(op.command(), &outcome));
            outcome
        }
        Err(e) => {
            log_event(LogEvent::operation_failed(op.command(), &e));
            return Err(e.into());
        }
    };

    report(op.label(), &outcome, json)
}

fn report(label: &str, outcome: &OperationOutcome, json: bool) -> Result<()> {
    if json {
        let value = match outcome {
            OperationOutcome::Completed {
                transaction,
                new_balance,
            } => json!({
                "stage": outcome.stage(),
                "transaction": transaction,
                "new_balance": new_balance,
            }),
            OperationOutcome::PartialFailure {
                transaction,
                balance_error,
                message,
            } => json!({
                "stage": outcome.stage(),
                "transaction": transaction,
                "balance_error": balance_error,
                "message": message,
            }),
        };
        return print_json(&value);
    }

    match outcome {
        OperationOutcome::Completed {
            transaction,
            new_balance,
        } => {
            output::success(&format!("{} completed", label));
            println!("  Transaction: {}", transaction.id);
            println!("  New balance: {}", output::format_amount(*new_balance));
        }
        OperationOutcome::PartialFailure {
            transaction,
            message,
            ..
        } => {
            output::warning(&format!("{} partially completed", label));
            output::warning(message);
            println!(
                "{}",
                format!(
                    "  Check the balance of account {} before retrying.",
                    transaction.account_id
                )
                .dimmed()
            );
        }
    }
    Ok(())
}
