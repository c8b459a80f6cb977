//! Deposit, withdrawal, transfer and service payment
//!
//! A banking operation is two backend calls: create the transaction record,
//! then move the account balance. The backend offers no atomic endpoint for
//! both, so the orchestrator runs them strictly in order and reports the
//! case where the first succeeded and the second did not as a
//! `PartialFailure` value instead of an error. Nothing is retried or
//! rolled back; the caller decides what to do with a partial failure.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{
    BalanceUpdate, Transaction, TransactionCreate, TransactionKind, Validate,
};

use super::accounts::AccountService;
use super::transactions::TransactionService;

/// Where an operation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStage {
    Validating,
    CreatingTransaction,
    UpdatingBalance,
    Completed,
    PartialFailure,
}

impl OperationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStage::Validating => "validating",
            OperationStage::CreatingTransaction => "creating_transaction",
            OperationStage::UpdatingBalance => "updating_balance",
            OperationStage::Completed => "completed",
            OperationStage::PartialFailure => "partial_failure",
        }
    }

    /// Stage at which a failed `process_transaction` call stopped
    pub fn of_failure(error: &Error) -> Self {
        match error {
            Error::TransactionCreation(_) => OperationStage::CreatingTransaction,
            _ => OperationStage::Validating,
        }
    }
}

/// Result of an operation that got past transaction creation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationOutcome {
    /// Transaction recorded and balance updated
    Completed {
        transaction: Transaction,
        new_balance: Decimal,
    },
    /// Transaction recorded, balance update failed
    PartialFailure {
        transaction: Transaction,
        balance_error: String,
        message: String,
    },
}

impl OperationOutcome {
    pub fn stage(&self) -> OperationStage {
        match self {
            OperationOutcome::Completed { .. } => OperationStage::Completed,
            OperationOutcome::PartialFailure { .. } => OperationStage::PartialFailure,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OperationOutcome::Completed { .. })
    }

    pub fn transaction(&self) -> &Transaction {
        match self {
            OperationOutcome::Completed { transaction, .. }
            | OperationOutcome::PartialFailure { transaction, .. } => transaction,
        }
    }

    /// The failed balance update as an error value, if there was one
    pub fn balance_error(&self) -> Option<Error> {
        match self {
            OperationOutcome::Completed { .. } => None,
            OperationOutcome::PartialFailure { balance_error, .. } => {
                Some(Error::BalanceUpdate(balance_error.clone()))
            }
        }
    }
}

/// Stateless sequencer over the transaction and account services
#[derive(Clone)]
pub struct TransactionOrchestrator {
    transactions: TransactionService,
    accounts: AccountService,
}

impl TransactionOrchestrator {
    pub fn new(transactions: TransactionService, accounts: AccountService) -> Self {
        Self {
            transactions,
            accounts,
        }
    }

    /// Validate, create the transaction, then update the source balance.
    ///
    /// Errors:
    /// - `Validation` when the request is rejected locally (no network call)
    /// - `Auth` when nobody is logged in (no network call)
    /// - `TransactionCreation` when the record could not be created; the
    ///   balance is not touched
    pub async fn process_transaction(&self, request: TransactionCreate) -> Result<OperationOutcome> {
        debug!(stage = ?OperationStage::Validating, kind = %request.kind, "operation");
        request.validate().into_result()?;
        self.transactions.require_user_id()?;

        debug!(stage = ?OperationStage::CreatingTransaction, kind = %request.kind, "operation");
        let transaction = self
            .transactions
            .create(&request)
            .await
            .map_err(|e| Error::TransactionCreation(Box::new(e)))?;

        debug!(stage = ?OperationStage::UpdatingBalance, transaction_id = %transaction.id, "operation");
        let update = BalanceUpdate {
            account_id: request.account_id.clone(),
            amount: request.amount,
            direction: request.kind.balance_direction(),
            transaction_id: transaction.id.clone(),
        };

        match self.accounts.apply_balance(&update).await {
            Ok(account) => {
                info!(transaction_id = %transaction.id, kind = %request.kind, "operation completed");
                Ok(OperationOutcome::Completed {
                    transaction,
                    new_balance: account.balance,
                })
            }
            Err(e) => {
                let balance_error = e.user_message();
                warn!(
                    transaction_id = %transaction.id,
                    error = %balance_error,
                    "transaction recorded but balance update failed"
                );
                Ok(OperationOutcome::PartialFailure {
                    message: format!(
                        "Transaction {} was recorded but the account balance was not updated: {}",
                        transaction.id, balance_error
                    ),
                    transaction,
                    balance_error,
                })
            }
        }
    }

    pub async fn deposit(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<OperationOutcome> {
        self.process_transaction(build(TransactionKind::Deposit, account_id, amount, description))
            .await
    }

    pub async fn withdraw(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<OperationOutcome> {
        self.process_transaction(build(TransactionKind::Withdrawal, account_id, amount, description))
            .await
    }

    pub async fn transfer(
        &self,
        source_account_id: &str,
        destination_account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<OperationOutcome> {
        let request = build(TransactionKind::Transfer, source_account_id, amount, description)
            .with_destination(destination_account_id);
        self.process_transaction(request).await
    }

    pub async fn pay_service(
        &self,
        account_id: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<OperationOutcome> {
        self.process_transaction(build(TransactionKind::ServicePayment, account_id, amount, description))
            .await
    }
}

fn build(kind: TransactionKind, account_id: &str, amount: Decimal, description: Option<&str>) -> TransactionCreate {
    let request = TransactionCreate::new(kind, amount, account_id.trim());
    match description {
        Some(d) => request.with_description(d),
        None => request,
    }
}
