//! Session and authentication payloads

use serde::{Deserialize, Serialize};

use super::user::User;
use super::validation::{Checker, Validate, ValidationReport};

/// An authenticated session: opaque bearer token plus the user it belongs to
///
/// Serialized with the same two keys the web client kept in local storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "authToken")]
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl Session {
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().and_then(User::user_id)
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }
}

/// Body returned by `/auth/login` and `/auth/registro`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

impl From<AuthResponse> for Session {
    fn from(response: AuthResponse) -> Self {
        Session {
            token: response.access_token,
            user: response.user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require(&self.username, "username is required")
            .require(&self.password, "password is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub username: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require(&self.first_name, "first name is required")
            .require(&self.last_name, "last name is required")
            .require(&self.username, "username is required")
            .require(&self.password, "password is required")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_response_into_session() {
        let response: AuthResponse = serde_json::from_value(json!({
            "access_token": "tok",
            "token_type": "bearer",
            "user": {"idUser": "u1", "username": "ana", "es_admin": true}
        }))
        .unwrap();
        let session = Session::from(response);
        assert_eq!(session.token, "tok");
        assert_eq!(session.user_id(), Some("u1"));
        assert!(session.is_admin());
    }

    #[test]
    fn test_session_storage_keys() {
        let session = Session { token: "tok".into(), user: None };
        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["authToken"], "tok");
        assert!(!session.is_admin());
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn test_login_requires_both_fields() {
        let req = LoginRequest { username: "".into(), password: "".into() };
        assert_eq!(req.validate().errors.len(), 2);
    }
}
