//! Branch service

use crate::domain::result::Result;
use crate::domain::{Branch, BranchCreate, BranchUpdate};
use crate::ports::ApiRequest;

use super::resource::{Resource, ResourceService};

impl Resource for Branch {
    const ENDPOINT: &'static str = "/sucursales";
    const NAME: &'static str = "branch";
    type Create = BranchCreate;
    type Update = BranchUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

pub type BranchService = ResourceService<Branch>;

impl ResourceService<Branch> {
    /// GET `/sucursales/ciudad/{city}`
    pub async fn by_city(&self, city: &str) -> Result<Vec<Branch>> {
        self.fetch(ApiRequest::get(Self::nested(&["ciudad", city.trim()])))
            .await
    }
}
