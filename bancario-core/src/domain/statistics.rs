//! Client-side aggregation and filtering over fetched transactions

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

use super::transaction::{Transaction, TransactionKind};
use super::wire;

/// Summary figures for a list of transactions
///
/// Service payments are counted but not summed into any total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatistics {
    pub count: usize,
    #[serde(with = "wire::amount")]
    pub total_deposits: Decimal,
    #[serde(with = "wire::amount")]
    pub total_withdrawals: Decimal,
    #[serde(with = "wire::amount")]
    pub total_transfers: Decimal,
    #[serde(with = "wire::amount")]
    pub net_balance: Decimal,
    #[serde(with = "wire::amount")]
    pub average_amount: Decimal,
}

impl TransactionStatistics {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut stats = TransactionStatistics {
            count: transactions.len(),
            ..Default::default()
        };

        for tx in transactions {
            match tx.kind {
                TransactionKind::Deposit => stats.total_deposits += tx.amount,
                TransactionKind::Withdrawal => stats.total_withdrawals += tx.amount,
                TransactionKind::Transfer => stats.total_transfers += tx.amount,
                TransactionKind::ServicePayment => {}
            }
        }

        stats.net_balance = stats.total_deposits - stats.total_withdrawals;
        if stats.count > 0 {
            stats.average_amount =
                (stats.total_deposits + stats.total_withdrawals) / Decimal::from(stats.count);
        }
        stats
    }
}

/// Conjunctive filter over a transaction list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Substring of the source account id
    pub account_id: Option<String>,
    /// First day included
    pub from: Option<NaiveDate>,
    /// Last day included, through its final millisecond
    pub to: Option<NaiveDate>,
}

impl TransactionFilter {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.account_id.as_deref().map(str::trim).unwrap_or("").is_empty()
            && self.from.is_none()
            && self.to.is_none()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        if let Some(kind) = self.kind {
            if tx.kind != kind {
                return false;
            }
        }

        if let Some(needle) = self.account_id.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            if !tx.account_id.contains(needle) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let Some(date) = tx.effective_date() else {
                return false;
            };
            if let Some(start) = self.start_bound() {
                if date < start {
                    return false;
                }
            }
            if let Some(end) = self.end_bound() {
                if date > end {
                    return false;
                }
            }
        }

        true
    }

    /// Filtered view, original order kept
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|tx| self.matches(tx)).collect()
    }

    /// Owned copy of the filtered view, ready for statistics
    pub fn apply_owned(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        self.apply(transactions).into_iter().cloned().collect()
    }

    fn start_bound(&self) -> Option<NaiveDateTime> {
        self.from.map(|d| d.and_time(NaiveTime::MIN))
    }

    fn end_bound(&self) -> Option<NaiveDateTime> {
        self.to
            .and_then(|d| d.and_hms_milli_opt(23, 59, 59, 999))
    }
}
