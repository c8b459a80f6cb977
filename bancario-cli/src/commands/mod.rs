//! CLI command implementations

pub mod accounts;
pub mod auth;
pub mod branches;
pub mod clients;
pub mod config;
pub mod employees;
pub mod logs;
pub mod operations;
pub mod transactions;
pub mod users;

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use bancario_core::services::{EntryPoint, LogEvent, LoggingService};
use bancario_core::BancarioContext;

/// Data directory override
pub const DATA_DIR_ENV: &str = "BANCARIO_DIR";

/// Event log in the data directory
pub fn open_log() -> Result<LoggingService> {
    LoggingService::new(&get_data_dir()?, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
}

/// Record an event; a failing event log never fails the command.
///
/// The log is opened per event, so no connection is held while a command
/// (such as `bk logs`) opens its own.
pub fn log_event(event: LogEvent) {
    if let Err(e) = open_log().and_then(|log| log.record(&event)) {
        debug!(error = %e, "event not recorded");
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    match std::env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => Ok(PathBuf::from(dir)),
        _ => dirs::home_dir()
            .map(|home| home.join(".bancario"))
            .ok_or_else(|| anyhow!("Could not find home directory; set {}", DATA_DIR_ENV)),
    }
}

/// Build the context: settings, stored session and HTTP client
pub fn get_context() -> Result<BancarioContext> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    debug!(data_dir = %data_dir.display(), "loading context");

    BancarioContext::new(&data_dir).context("Failed to initialize banking client")
}

/// Parse a user-supplied amount ("100", "12.50", "1,000.50").
///
/// Commas are accepted only as thousands separators; "12,50" is rejected
/// rather than read as 1250.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let trimmed = raw.trim();
    let invalid = || anyhow!("Invalid amount '{}'", raw);

    let normalized = if trimmed.contains(',') {
        let (integer, fraction) = match trimmed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (trimmed, None),
        };
        let unsigned = integer.strip_prefix('-').unwrap_or(integer);
        let mut groups = unsigned.split(',');
        let first_ok = groups
            .next()
            .map_or(false, |g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
        if !first_ok || !groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit())) {
            return Err(invalid());
        }
        let mut joined = integer.replace(',', "");
        if let Some(fraction) = fraction {
            joined.push('.');
            joined.push_str(fraction);
        }
        joined
    } else {
        trimmed.to_string()
    };

    normalized.parse::<Decimal>().map_err(|_| invalid())
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Refuse write commands early when nobody is logged in
pub fn require_login(ctx: &BancarioContext) -> Result<()> {
    if ctx.auth.is_authenticated() {
        Ok(())
    } else {
        Err(anyhow!("Not logged in. Run 'bk login' first."))
    }
}

/// User, employee and branch administration is for administrators only
pub fn require_admin(ctx: &BancarioContext) -> Result<()> {
    require_login(ctx)?;
    if ctx.auth.require_admin().is_err() {
        bail!("Administrator rights required. Log in with an administrator account.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use bancario_core::adapters::{MemorySessionStore, ReqwestHttpClient};
    use bancario_core::config::Config;
    use bancario_core::Session;

    fn context_as(session: Option<Session>) -> BancarioContext {
        let store = match session {
            Some(s) => MemorySessionStore::with_session(s),
            None => MemorySessionStore::new(),
        };
        let http = ReqwestHttpClient::new("http://localhost:8000", None).unwrap();
        BancarioContext::with_parts(Config::default(), Arc::new(http), Arc::new(store)).unwrap()
    }

    fn session(admin: bool) -> Session {
        Session {
            token: "tok".into(),
            user: Some(serde_json::from_value(serde_json::json!({"idUser": "u1", "es_admin": admin})).unwrap()),
        }
    }

    #[test]
    fn test_admin_commands_need_admin_session() {
        let err = require_admin(&context_as(None)).unwrap_err();
        assert!(err.to_string().contains("Not logged in"));

        let err = require_admin(&context_as(Some(session(false)))).unwrap_err();
        assert!(err.to_string().contains("Administrator rights required"));

        assert!(require_admin(&context_as(Some(session(true)))).is_ok());
        assert!(require_login(&context_as(Some(session(false)))).is_ok());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.50").unwrap(), Decimal::new(1250, 2));
        assert_eq!(parse_amount(" 1,000 ").unwrap(), Decimal::new(1000, 0));
        assert_eq!(parse_amount("1,234,567.89").unwrap(), Decimal::new(123456789, 2));
        assert!(parse_amount("diez").is_err());
    }

    #[test]
    fn test_parse_amount_rejects_decimal_comma() {
        assert!(parse_amount("12,50").is_err());
        assert!(parse_amount("1,00").is_err());
        assert!(parse_amount("1,0000").is_err());
        assert!(parse_amount(",100").is_err());
        assert!(parse_amount("1000,000").is_err());
        assert!(parse_amount("1.000,50").is_err());
    }
}
