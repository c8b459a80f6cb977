//! Employee service

use crate::domain::result::Result;
use crate::domain::{Employee, EmployeeCreate, EmployeeUpdate};
use crate::ports::ApiRequest;

use super::resource::{Resource, ResourceService};

impl Resource for Employee {
    const ENDPOINT: &'static str = "/empleados";
    const NAME: &'static str = "employee";
    type Create = EmployeeCreate;
    type Update = EmployeeUpdate;

    fn id(&self) -> &str {
        &self.id
    }
}

pub type EmployeeService = ResourceService<Employee>;

impl ResourceService<Employee> {
    /// GET `/empleados/sucursal/{branch_id}`
    pub async fn by_branch(&self, branch_id: &str) -> Result<Vec<Employee>> {
        self.fetch(ApiRequest::get(Self::nested(&["sucursal", branch_id])))
            .await
    }
}
