//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. All of them share
//! one `SessionState` and reach the backend through one `ApiGateway`.

pub mod accounts;
mod auth;
pub mod branches;
pub mod clients;
pub mod employees;
mod gateway;
pub mod logging;
pub mod operations;
pub mod resource;
mod session;
pub mod transactions;
pub mod users;

pub use accounts::AccountService;
pub use auth::AuthService;
pub use branches::BranchService;
pub use clients::ClientService;
pub use employees::EmployeeService;
pub use gateway::ApiGateway;
pub use logging::{EntryPoint, EventKind, LogEntry, LogEvent, LogQuery, LoggingService};
pub use operations::{OperationOutcome, OperationStage, TransactionOrchestrator};
pub use resource::{Resource, ResourceService};
pub use session::SessionState;
pub use transactions::TransactionService;
pub use users::UserService;
