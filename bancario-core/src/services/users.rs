//! User administration service

use serde_json::Value as JsonValue;

use crate::domain::result::Result;
use crate::domain::{PasswordChange, User, UserCreate, UserUpdate, Validate};
use crate::ports::ApiRequest;

use super::resource::{Resource, ResourceService};

impl Resource for User {
    const ENDPOINT: &'static str = "/usuarios";
    const NAME: &'static str = "user";
    type Create = UserCreate;
    type Update = UserUpdate;

    fn id(&self) -> &str {
        self.user_id().unwrap_or_default()
    }
}

pub type UserService = ResourceService<User>;

impl ResourceService<User> {
    /// POST `/usuarios/{id}/cambiar-contraseña`
    pub async fn change_password(&self, user_id: &str, change: &PasswordChange) -> Result<JsonValue> {
        change.validate().into_result()?;
        let request = ApiRequest::post(
            Self::nested(&[user_id, "cambiar-contraseña"]),
            serde_json::to_value(change)?,
        );
        self.fetch(request).await
    }
}
