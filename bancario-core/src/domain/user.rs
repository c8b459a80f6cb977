//! Application user model

use serde::{Deserialize, Serialize};

use super::audit::AuditFields;
use super::validation::{Checker, Validate, ValidationReport};
use super::wire;

/// Minimum length accepted for a new password
pub const MIN_PASSWORD_LEN: usize = 6;

/// A user of the banking application (operator, not bank client)
///
/// The backend has shipped the identifier under three names over time;
/// all are read and [`User::user_id`] resolves them in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(
        rename = "idUser",
        default,
        deserialize_with = "wire::flexible_id_option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(
        rename = "id",
        default,
        deserialize_with = "wire::flexible_id_option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    legacy_id: Option<String>,
    #[serde(
        rename = "userId",
        default,
        deserialize_with = "wire::flexible_id_option::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    alt_id: Option<String>,
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(rename = "activo", default = "default_active")]
    pub active: bool,
    #[serde(rename = "es_admin", default)]
    pub is_admin: bool,
    #[serde(flatten)]
    pub audit: AuditFields,
}

fn default_active() -> bool {
    true
}

impl User {
    /// Identifier: `idUser`, else `id`, else `userId`
    pub fn user_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .or(self.legacy_id.as_deref())
            .or(self.alt_id.as_deref())
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Payload for `POST /usuarios`
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserCreate {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "es_admin")]
    pub is_admin: bool,
}

impl Validate for UserCreate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require(&self.first_name, "first name is required")
            .require(&self.last_name, "last name is required")
            .require(&self.username, "username is required")
            .require(&self.password, "password is required")
            .finish()
    }
}

/// Partial payload for `PUT /usuarios/{id}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(rename = "firstName", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "es_admin", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl Validate for UserUpdate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require_if_present(self.first_name.as_deref(), "first name cannot be empty")
            .require_if_present(self.last_name.as_deref(), "last name cannot be empty")
            .require_if_present(self.username.as_deref(), "username cannot be empty")
            .require_if_present(self.password.as_deref(), "password cannot be empty")
            .finish()
    }
}

/// Payload for `POST /usuarios/{id}/cambiar-contraseña`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordChange {
    #[serde(rename = "contraseña_actual")]
    pub current: String,
    #[serde(rename = "nueva_contraseña")]
    pub new: String,
}

impl Validate for PasswordChange {
    fn validate(&self) -> ValidationReport {
        let mut checker = Checker::new();
        checker
            .require(&self.current, "current password is required")
            .require(&self.new, "new password is required");
        if !self.new.trim().is_empty() {
            checker.min_len(
                &self.new,
                MIN_PASSWORD_LEN,
                "new password must be at least 6 characters",
            );
        }
        checker.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_id_fallback_order() {
        let u: User = serde_json::from_value(json!({"idUser": "a", "id": "b", "userId": "c"})).unwrap();
        assert_eq!(u.user_id(), Some("a"));

        let u: User = serde_json::from_value(json!({"id": 42, "userId": "c"})).unwrap();
        assert_eq!(u.user_id(), Some("42"));

        let u: User = serde_json::from_value(json!({"userId": "c"})).unwrap();
        assert_eq!(u.user_id(), Some("c"));

        let u: User = serde_json::from_value(json!({"username": "ana"})).unwrap();
        assert_eq!(u.user_id(), None);
        assert!(u.active);
        assert!(!u.is_admin);
    }

    #[test]
    fn test_user_survives_round_trip() {
        let original: User = serde_json::from_value(json!({
            "id": "u7", "firstName": "Ana", "lastName": "Ruiz",
            "username": "ana", "activo": true, "es_admin": true
        }))
        .unwrap();
        let stored = serde_json::to_string(&original).unwrap();
        let restored: User = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored.user_id(), Some("u7"));
        assert!(restored.is_admin);
        assert_eq!(restored.display_name(), "Ana Ruiz");
    }

    #[test]
    fn test_password_change_rules() {
        let short = PasswordChange { current: "old".into(), new: "12345".into() };
        assert_eq!(
            short.validate().errors,
            vec!["new password must be at least 6 characters".to_string()]
        );

        let ok = PasswordChange { current: "old".into(), new: "123456".into() };
        assert!(ok.validate().valid);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            json!({"contraseña_actual": "old", "nueva_contraseña": "123456"})
        );
    }
}
