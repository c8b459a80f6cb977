//! Bancario Core - typed client for the banking REST backend
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: records, request payloads, validation, statistics, errors
//! - **ports**: trait definitions for external dependencies (HttpClient, SessionStore)
//! - **services**: session handling, CRUD services, the transaction orchestrator
//! - **adapters**: concrete implementations (reqwest, session file)

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{FileSessionStore, ReqwestHttpClient};
use config::Config;
use ports::{HttpClient, SessionStore};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, HttpError};
pub use domain::{
    Account, Branch, Client, Employee, Page, Session, Transaction, TransactionFilter,
    TransactionKind, TransactionStatistics, User,
};
pub use services::{OperationOutcome, OperationStage};

/// Main context for banking operations
///
/// Holds the configuration, the shared session and every service, all
/// wired to the same HTTP client.
pub struct BancarioContext {
    pub config: Config,
    pub session: Arc<SessionState>,
    pub auth: AuthService,
    pub accounts: AccountService,
    pub clients: ClientService,
    pub employees: EmployeeService,
    pub branches: BranchService,
    pub users: UserService,
    pub transactions: TransactionService,
    pub operations: TransactionOrchestrator,
}

impl BancarioContext {
    /// Build a context from the data directory: settings, stored session,
    /// and a reqwest client for the configured base URL
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;
        let http = Arc::new(ReqwestHttpClient::new(&config.base_url, config.timeout())?);
        let store = Arc::new(FileSessionStore::new(data_dir));
        Self::with_parts(config, http, store)
    }

    /// Build a context from explicit collaborators
    pub fn with_parts(
        config: Config,
        http: Arc<dyn HttpClient>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self> {
        let session = Arc::new(SessionState::restore(store)?);
        let gateway = ApiGateway::new(http, Arc::clone(&session));

        let accounts = AccountService::new(gateway.clone());
        let transactions = TransactionService::new(gateway.clone());
        let operations = TransactionOrchestrator::new(transactions.clone(), accounts.clone());

        Ok(Self {
            config,
            auth: AuthService::new(gateway.clone()),
            clients: ClientService::new(gateway.clone()),
            employees: EmployeeService::new(gateway.clone()),
            branches: BranchService::new(gateway.clone()),
            users: UserService::new(gateway),
            session,
            accounts,
            transactions,
            operations,
        })
    }

    /// Default page for list calls, sized from the configuration
    pub fn page(&self) -> Page {
        Page::new(0, self.config.page_size)
    }
}
