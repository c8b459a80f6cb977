//! Bank client (customer) model

use serde::{Deserialize, Serialize};

use super::audit::AuditFields;
use super::validation::{Checker, Validate, ValidationReport};
use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    #[serde(rename = "idCliente", deserialize_with = "wire::flexible_id::deserialize")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "telefono", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "idUsuario", default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "idSucursal", default, skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Client {
    /// Case-insensitive match on name, document or email
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&term)
            || self.document.to_lowercase().contains(&term)
            || self
                .email
                .as_deref()
                .map(|e| e.to_lowercase().contains(&term))
                .unwrap_or(false)
    }
}

/// Payload for `POST /clientes`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientCreate {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub email: String,
    #[serde(rename = "idSucursal", skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

impl Validate for ClientCreate {
    fn validate(&self) -> ValidationReport {
        let mut checker = Checker::new();
        checker
            .min_len(&self.name, 2, "name must be at least 2 characters")
            .min_len(&self.document, 3, "document must be at least 3 characters");
        if self.email.trim().is_empty() {
            checker.check(false, "email is required");
        } else {
            checker.email(self.email.trim(), "email format is invalid");
        }
        checker.finish()
    }
}

/// Partial payload for `PUT /clientes/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClientUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "documento", skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "idUsuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "idSucursal", skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

impl Validate for ClientUpdate {
    fn validate(&self) -> ValidationReport {
        let mut checker = Checker::new();
        if let Some(name) = &self.name {
            checker.min_len(name, 2, "name must be at least 2 characters");
        }
        if let Some(document) = &self.document {
            checker.min_len(document, 3, "document must be at least 3 characters");
        }
        if let Some(email) = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
            checker.email(email, "email format is invalid");
        }
        checker.finish()
    }
}

/// Server-side filters for `GET /clientes`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilter {
    pub name: Option<String>,
    pub document: Option<String>,
    pub email: Option<String>,
    pub branch_id: Option<String>,
}

impl ClientFilter {
    /// Query parameters; blank values are left out
    pub fn to_params(&self) -> Vec<(String, String)> {
        [
            ("nombre", &self.name),
            ("documento", &self.document),
            ("email", &self.email),
            ("idSucursal", &self.branch_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key.to_string(), v.to_string()))
        })
        .collect()
    }

    /// Same filter applied to an already-fetched list (AND, substring, case-insensitive)
    pub fn matches(&self, client: &Client) -> bool {
        fn contains(haystack: Option<&str>, needle: &Option<String>) -> bool {
            match needle.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
                None => true,
                Some(n) => haystack
                    .map(|h| h.to_lowercase().contains(&n.to_lowercase()))
                    .unwrap_or(false),
            }
        }

        let branch_ok = match self.branch_id.as_deref().filter(|b| !b.trim().is_empty()) {
            None => true,
            Some(b) => client.branch_id.as_deref() == Some(b.trim()),
        };

        contains(Some(&client.name), &self.name)
            && contains(Some(&client.document), &self.document)
            && contains(client.email.as_deref(), &self.email)
            && branch_ok
    }
}
