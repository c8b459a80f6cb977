//! Employee model

use serde::{Deserialize, Serialize};

use super::audit::AuditFields;
use super::validation::{Checker, Validate, ValidationReport};
use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "idEmpleado", deserialize_with = "wire::flexible_id::deserialize")]
    pub id: String,
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "cargo")]
    pub position: String,
    #[serde(rename = "idSucursal")]
    pub branch_id: String,
    #[serde(rename = "idUsuario")]
    pub user_id: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

impl Employee {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmployeeCreate {
    #[serde(rename = "nombre")]
    pub first_name: String,
    #[serde(rename = "apellido")]
    pub last_name: String,
    #[serde(rename = "cargo")]
    pub position: String,
    #[serde(rename = "idSucursal")]
    pub branch_id: String,
    #[serde(rename = "idUsuario")]
    pub user_id: String,
}

impl Validate for EmployeeCreate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require(&self.first_name, "first name is required")
            .require(&self.last_name, "last name is required")
            .require(&self.position, "position is required")
            .require(&self.branch_id, "branch is required")
            .require(&self.user_id, "user is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmployeeUpdate {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(rename = "apellido", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(rename = "cargo", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(rename = "idSucursal", skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
    #[serde(rename = "idUsuario", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Validate for EmployeeUpdate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require_if_present(self.first_name.as_deref(), "first name cannot be empty")
            .require_if_present(self.last_name.as_deref(), "last name cannot be empty")
            .require_if_present(self.position.as_deref(), "position cannot be empty")
            .require_if_present(self.branch_id.as_deref(), "branch cannot be empty")
            .require_if_present(self.user_id.as_deref(), "user cannot be empty")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_fields_required_on_create() {
        let report = EmployeeCreate::default().validate();
        assert_eq!(report.errors.len(), 5);

        let ok = EmployeeCreate {
            first_name: "Rosa".into(),
            last_name: "Díaz".into(),
            position: "Cajera".into(),
            branch_id: "s1".into(),
            user_id: "u9".into(),
        };
        assert!(ok.validate().valid);
    }

    #[test]
    fn test_update_rejects_blank_supplied_field() {
        let update = EmployeeUpdate {
            position: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(update.validate().errors, vec!["position cannot be empty".to_string()]);
    }
}
