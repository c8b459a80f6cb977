//! Transaction domain model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::audit::AuditFields;
use super::validation::{Checker, Validate, ValidationReport};
use super::wire;

/// Kind of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "DEPOSITO")]
    Deposit,
    #[serde(rename = "RETIRO")]
    Withdrawal,
    #[serde(rename = "TRANSFERENCIA")]
    Transfer,
    #[serde(rename = "PAGO_SERVICIO")]
    ServicePayment,
}

impl TransactionKind {
    pub fn code(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSITO",
            TransactionKind::Withdrawal => "RETIRO",
            TransactionKind::Transfer => "TRANSFERENCIA",
            TransactionKind::ServicePayment => "PAGO_SERVICIO",
        }
    }

    /// Direction applied to the source account's balance
    pub fn balance_direction(&self) -> BalanceDirection {
        match self {
            TransactionKind::Deposit => BalanceDirection::Credit,
            TransactionKind::Withdrawal
            | TransactionKind::Transfer
            | TransactionKind::ServicePayment => BalanceDirection::Debit,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEPOSITO" | "DEPOSIT" => Ok(TransactionKind::Deposit),
            "RETIRO" | "WITHDRAWAL" | "WITHDRAW" => Ok(TransactionKind::Withdrawal),
            "TRANSFERENCIA" | "TRANSFER" => Ok(TransactionKind::Transfer),
            "PAGO_SERVICIO" | "SERVICE_PAYMENT" | "PAYMENT" => Ok(TransactionKind::ServicePayment),
            other => Err(format!(
                "invalid transaction type '{}', expected one of DEPOSITO, RETIRO, TRANSFERENCIA, PAGO_SERVICIO",
                other
            )),
        }
    }
}

/// Balance operation sent to `/cuentas/actualizar-saldo`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceDirection {
    #[serde(rename = "CREDITO")]
    Credit,
    #[serde(rename = "DEBITO")]
    Debit,
}

/// A recorded money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "idTransaccion", deserialize_with = "wire::flexible_id::deserialize")]
    pub id: String,
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    #[serde(rename = "monto", with = "wire::amount")]
    pub amount: Decimal,
    #[serde(rename = "idCuenta")]
    pub account_id: String,
    #[serde(rename = "idCuentaDestino", default, skip_serializing_if = "Option::is_none")]
    pub destination_account_id: Option<String>,
    #[serde(rename = "numeroCuenta", default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(rename = "numeroCuentaDestino", default, skip_serializing_if = "Option::is_none")]
    pub destination_account_number: Option<String>,
    #[serde(rename = "descripcion", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "fecha",
        default,
        with = "wire::timestamp_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Transaction {
    /// Date used for range filters: `fecha`, falling back to the creation stamp
    pub fn effective_date(&self) -> Option<NaiveDateTime> {
        self.date.or(self.audit.created_at)
    }
}

/// Payload for `POST /transacciones/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionCreate {
    #[serde(rename = "tipo")]
    pub kind: TransactionKind,
    #[serde(rename = "monto", with = "wire::amount")]
    pub amount: Decimal,
    #[serde(rename = "idCuenta")]
    pub account_id: String,
    #[serde(rename = "idCuentaDestino", skip_serializing_if = "Option::is_none")]
    pub destination_account_id: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransactionCreate {
    pub fn new(kind: TransactionKind, amount: Decimal, account_id: impl Into<String>) -> Self {
        Self {
            kind,
            amount,
            account_id: account_id.into(),
            destination_account_id: None,
            description: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination_account_id = Some(destination.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        if !description.trim().is_empty() {
            self.description = Some(description);
        }
        self
    }
}

impl Validate for TransactionCreate {
    fn validate(&self) -> ValidationReport {
        let mut checker = Checker::new();
        checker
            .positive(self.amount, "amount must be greater than 0")
            .require(&self.account_id, "source account is required");

        if self.kind == TransactionKind::Transfer {
            match self.destination_account_id.as_deref().map(str::trim) {
                None | Some("") => {
                    checker.check(false, "destination account is required for a transfer");
                }
                Some(dest) => {
                    checker.check(
                        dest != self.account_id.trim(),
                        "source and destination accounts must differ",
                    );
                }
            }
        }
        checker.finish()
    }
}

/// Partial payload for `PUT /transacciones/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct TransactionUpdate {
    #[serde(rename = "tipo", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(
        rename = "monto",
        with = "wire::amount_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(rename = "idCuenta", skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Validate for TransactionUpdate {
    fn validate(&self) -> ValidationReport {
        let mut checker = Checker::new();
        if let Some(amount) = self.amount {
            checker.positive(amount, "amount must be greater than 0");
        }
        checker
            .require_if_present(self.account_id.as_deref(), "account id cannot be empty")
            .finish()
    }
}

/// Server-side paging and type filter for the transaction list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub skip: u32,
    pub limit: u32,
    pub kind: Option<TransactionKind>,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: super::DEFAULT_PAGE_SIZE,
            kind: None,
        }
    }
}

impl TransactionQuery {
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("skip".to_string(), self.skip.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(kind) = self.kind {
            params.push(("tipo".to_string(), kind.code().to_string()));
        }
        params
    }
}

/// Payload for `PUT /cuentas/actualizar-saldo`
#[derive(Debug, Clone, Serialize)]
pub struct BalanceUpdate {
    #[serde(rename = "idCuenta")]
    pub account_id: String,
    #[serde(rename = "monto", with = "wire::amount")]
    pub amount: Decimal,
    #[serde(rename = "operacion")]
    pub direction: BalanceDirection,
    #[serde(rename = "idTransaccion")]
    pub transaction_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn amount(v: i64) -> Decimal {
        Decimal::new(v, 0)
    }

    #[test]
    fn test_transfer_requires_distinct_destination() {
        let missing = TransactionCreate::new(TransactionKind::Transfer, amount(10), "a1");
        assert_eq!(
            missing.validate().errors,
            vec!["destination account is required for a transfer".to_string()]
        );

        let same = missing.clone().with_destination("a1");
        assert_eq!(
            same.validate().errors,
            vec!["source and destination accounts must differ".to_string()]
        );

        let ok = TransactionCreate::new(TransactionKind::Transfer, amount(10), "a1").with_destination("a2");
        assert!(ok.validate().valid);
    }

    #[test]
    fn test_amount_must_be_positive() {
        let zero = TransactionCreate::new(TransactionKind::Deposit, Decimal::ZERO, "a1");
        assert!(!zero.validate().valid);

        let negative = TransactionCreate::new(TransactionKind::Withdrawal, amount(-3), "");
        assert_eq!(negative.validate().errors.len(), 2);
    }

    #[test]
    fn test_create_payload_shape() {
        let payload = TransactionCreate::new(TransactionKind::Deposit, Decimal::new(2550, 2), "a1")
            .with_description("");
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({"tipo": "DEPOSITO", "monto": 25.5, "idCuenta": "a1"})
        );
    }

    #[test]
    fn test_transaction_parses_optional_fields() {
        let tx: Transaction = serde_json::from_value(json!({
            "idTransaccion": 7,
            "tipo": "TRANSFERENCIA",
            "monto": "40.00",
            "idCuenta": "a1",
            "idCuentaDestino": "a2",
            "fecha": "2024-01-05T10:00:00"
        }))
        .unwrap();
        assert_eq!(tx.id, "7");
        assert_eq!(tx.kind, TransactionKind::Transfer);
        assert_eq!(tx.amount, amount(40));
        assert!(tx.effective_date().is_some());
    }

    #[test]
    fn test_balance_direction() {
        assert_eq!(TransactionKind::Deposit.balance_direction(), BalanceDirection::Credit);
        assert_eq!(TransactionKind::Transfer.balance_direction(), BalanceDirection::Debit);
        assert_eq!(TransactionKind::ServicePayment.balance_direction(), BalanceDirection::Debit);
    }

    #[test]
    fn test_query_params() {
        let query = TransactionQuery {
            kind: Some(TransactionKind::Withdrawal),
            ..Default::default()
        };
        assert_eq!(
            query.to_params(),
            vec![
                ("skip".to_string(), "0".to_string()),
                ("limit".to_string(), "100".to_string()),
                ("tipo".to_string(), "RETIRO".to_string()),
            ]
        );
    }
}
