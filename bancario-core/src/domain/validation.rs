//! Client-side field validation
//!
//! Advisory only: the backend is authoritative. Checks never fail fast,
//! they collect every message so the caller can present them together.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::result::Error;

/// Outcome of validating a request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a `Result`, turning an invalid report into `Error::Validation`
    pub fn into_result(self) -> Result<(), Error> {
        if self.valid {
            Ok(())
        } else {
            Err(Error::Validation(self.errors))
        }
    }
}

/// Requests that can be checked before they are sent
pub trait Validate {
    fn validate(&self) -> ValidationReport;
}

/// Collects messages for one request
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<String>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.errors.push(message.to_string());
        }
        self
    }

    /// Like `require`, but only if the field was supplied
    pub fn require_if_present(&mut self, value: Option<&str>, message: &str) -> &mut Self {
        if let Some(v) = value {
            self.require(v, message);
        }
        self
    }

    pub fn min_len(&mut self, value: &str, min: usize, message: &str) -> &mut Self {
        if value.trim().chars().count() < min {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn non_negative(&mut self, value: Decimal, message: &str) -> &mut Self {
        if value.is_sign_negative() && !value.is_zero() {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn positive(&mut self, value: Decimal, message: &str) -> &mut Self {
        if value <= Decimal::ZERO {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn email(&mut self, value: &str, message: &str) -> &mut Self {
        if !is_valid_email(value) {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> ValidationReport {
        ValidationReport::from_errors(std::mem::take(&mut self.errors))
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// Simple shape check: something@domain.tld, no whitespace
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value)
}
