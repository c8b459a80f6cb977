//! Login, registration and logout

use std::sync::Arc;

use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::{AuthResponse, LoginRequest, RegisterRequest, Session, User, Validate};
use crate::ports::ApiRequest;

use super::gateway::ApiGateway;
use super::session::SessionState;

pub struct AuthService {
    gateway: ApiGateway,
}

impl AuthService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    fn session(&self) -> &Arc<SessionState> {
        self.gateway.session()
    }

    /// POST `/auth/login`. Any failure leaves the client logged out.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<Session> {
        credentials.validate().into_result()?;
        let request = ApiRequest::post("/auth/login", serde_json::to_value(credentials)?);
        let result = self.gateway.send_anonymous::<AuthResponse>(request).await;
        self.establish(result)
    }

    /// POST `/auth/registro`; a successful registration is also a login
    pub async fn register(&self, profile: &RegisterRequest) -> Result<Session> {
        profile.validate().into_result()?;
        let request = ApiRequest::post("/auth/registro", serde_json::to_value(profile)?);
        let result = self.gateway.send_anonymous::<AuthResponse>(request).await;
        self.establish(result)
    }

    fn establish(&self, result: Result<AuthResponse>) -> Result<Session> {
        match result {
            Ok(response) => {
                let session = Session::from(response);
                info!(user_id = ?session.user_id(), "session established");
                self.session().set(session.clone());
                Ok(session)
            }
            Err(e) => {
                self.session().logout();
                Err(e)
            }
        }
    }

    pub fn logout(&self) {
        self.session().logout();
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session().is_admin()
    }

    /// Gate for user, employee and branch administration
    pub fn require_admin(&self) -> Result<()> {
        if !self.is_authenticated() {
            return Err(Error::auth("no authenticated user"));
        }
        if !self.is_admin() {
            return Err(Error::auth("administrator rights required"));
        }
        Ok(())
    }

    pub fn current_user_id(&self) -> Option<String> {
        self.session().current_user_id()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session().current_user()
    }

    pub fn token(&self) -> Option<String> {
        self.session().token()
    }
}
