//! Account domain model

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::audit::AuditFields;
use super::validation::{Checker, Validate, ValidationReport};
use super::wire;

/// Lifecycle status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    #[serde(rename = "ACTIVA")]
    Active,
    #[serde(rename = "INACTIVA")]
    Inactive,
    #[serde(rename = "BLOQUEADA")]
    Blocked,
    #[serde(rename = "CERRADA")]
    Closed,
}

impl AccountStatus {
    pub const ALL: [AccountStatus; 4] = [
        AccountStatus::Active,
        AccountStatus::Inactive,
        AccountStatus::Blocked,
        AccountStatus::Closed,
    ];

    /// Backend code
    pub fn code(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVA",
            AccountStatus::Inactive => "INACTIVA",
            AccountStatus::Blocked => "BLOQUEADA",
            AccountStatus::Closed => "CERRADA",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    /// Accepts the backend code or the English name, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ACTIVA" | "ACTIVE" => Ok(AccountStatus::Active),
            "INACTIVA" | "INACTIVE" => Ok(AccountStatus::Inactive),
            "BLOQUEADA" | "BLOCKED" => Ok(AccountStatus::Blocked),
            "CERRADA" | "CLOSED" => Ok(AccountStatus::Closed),
            other => Err(format!(
                "invalid account status '{}', expected one of ACTIVA, INACTIVA, BLOQUEADA, CERRADA",
                other
            )),
        }
    }
}

/// Product type of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    #[serde(rename = "AHORROS")]
    Savings,
    #[serde(rename = "CORRIENTE")]
    Checking,
    #[serde(rename = "PLAZO_FIJO")]
    Term,
}

impl AccountType {
    pub fn code(&self) -> &'static str {
        match self {
            AccountType::Savings => "AHORROS",
            AccountType::Checking => "CORRIENTE",
            AccountType::Term => "PLAZO_FIJO",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "AHORROS" | "SAVINGS" => Ok(AccountType::Savings),
            "CORRIENTE" | "CHECKING" => Ok(AccountType::Checking),
            "PLAZO_FIJO" | "TERM" => Ok(AccountType::Term),
            other => Err(format!(
                "invalid account type '{}', expected one of AHORROS, CORRIENTE, PLAZO_FIJO",
                other
            )),
        }
    }
}

/// A bank account owned by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "idCuenta", deserialize_with = "wire::flexible_id::deserialize")]
    pub id: String,
    #[serde(rename = "numeroCuenta")]
    pub number: String,
    #[serde(rename = "saldo", with = "wire::amount")]
    pub balance: Decimal,
    #[serde(rename = "estado")]
    pub status: AccountStatus,
    #[serde(rename = "tipoCuenta")]
    pub account_type: AccountType,
    #[serde(rename = "idCliente")]
    pub client_id: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

/// Payload for `POST /cuentas`
#[derive(Debug, Clone, Serialize)]
pub struct AccountCreate {
    #[serde(rename = "numeroCuenta")]
    pub number: String,
    #[serde(rename = "saldo", with = "wire::amount")]
    pub balance: Decimal,
    #[serde(rename = "estado")]
    pub status: AccountStatus,
    #[serde(rename = "tipoCuenta")]
    pub account_type: AccountType,
    #[serde(rename = "idCliente")]
    pub client_id: String,
}

impl AccountCreate {
    /// New active account with the given opening balance
    pub fn new(
        number: impl Into<String>,
        balance: Decimal,
        account_type: AccountType,
        client_id: impl Into<String>,
    ) -> Self {
        Self {
            number: number.into(),
            balance,
            status: AccountStatus::Active,
            account_type,
            client_id: client_id.into(),
        }
    }
}

impl Validate for AccountCreate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require(&self.number, "account number is required")
            .non_negative(self.balance, "balance cannot be negative")
            .require(&self.client_id, "a client must be selected")
            .finish()
    }
}

/// Partial payload for `PUT /cuentas/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountUpdate {
    #[serde(rename = "numeroCuenta", skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(
        rename = "saldo",
        with = "wire::amount_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<Decimal>,
    #[serde(rename = "estado", skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(rename = "tipoCuenta", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(rename = "idCliente", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

impl Validate for AccountUpdate {
    fn validate(&self) -> ValidationReport {
        let mut checker = Checker::new();
        checker
            .require_if_present(self.number.as_deref(), "account number cannot be empty")
            .require_if_present(self.client_id.as_deref(), "client id cannot be empty");
        if let Some(balance) = self.balance {
            checker.non_negative(balance, "balance cannot be negative");
        }
        checker.finish()
    }
}

impl Account {
    /// Case-insensitive match on number or type code
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.number.to_lowercase().contains(&term)
            || self.account_type.code().to_lowercase().contains(&term)
            || self.id.to_lowercase().contains(&term)
    }
}
