//! Core domain entities
//!
//! Records, request payloads and enums of the banking backend, plus the
//! client-side validation and statistics built on them. Pure data
//! structures - no I/O.

mod account;
pub mod audit;
mod branch;
mod client;
mod employee;
pub mod result;
mod session;
pub mod statistics;
mod transaction;
mod user;
pub mod validation;
pub mod wire;

pub use account::{Account, AccountCreate, AccountStatus, AccountType, AccountUpdate};
pub use audit::AuditFields;
pub use branch::{Branch, BranchCreate, BranchUpdate};
pub use client::{Client, ClientCreate, ClientFilter, ClientUpdate};
pub use employee::{Employee, EmployeeCreate, EmployeeUpdate};
pub use session::{AuthResponse, LoginRequest, RegisterRequest, Session};
pub use statistics::{TransactionFilter, TransactionStatistics};
pub use transaction::{
    BalanceDirection, BalanceUpdate, Transaction, TransactionCreate, TransactionKind,
    TransactionQuery, TransactionUpdate,
};
pub use user::{PasswordChange, User, UserCreate, UserUpdate, MIN_PASSWORD_LEN};
pub use validation::{Validate, ValidationReport};

/// Page size used when the caller does not choose one
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Offset paging for list endpoints (`skip`, `limit`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        vec![
            ("skip".to_string(), self.skip.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}
