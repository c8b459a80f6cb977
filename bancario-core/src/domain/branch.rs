//! Branch (sucursal) model

use serde::{Deserialize, Serialize};

use super::audit::AuditFields;
use super::validation::{Checker, Validate, ValidationReport};
use super::wire;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(rename = "idSucursal", deserialize_with = "wire::flexible_id::deserialize")]
    pub id: String,
    #[serde(rename = "nombreSucursal")]
    pub name: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(flatten)]
    pub audit: AuditFields,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchCreate {
    #[serde(rename = "nombreSucursal")]
    pub name: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
}

impl Validate for BranchCreate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require(&self.name, "branch name is required")
            .require(&self.city, "city is required")
            .require(&self.address, "address is required")
            .require(&self.phone, "phone is required")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BranchUpdate {
    #[serde(rename = "nombreSucursal", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "ciudad", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl Validate for BranchUpdate {
    fn validate(&self) -> ValidationReport {
        Checker::new()
            .require_if_present(self.name.as_deref(), "branch name cannot be empty")
            .require_if_present(self.city.as_deref(), "city cannot be empty")
            .require_if_present(self.address.as_deref(), "address cannot be empty")
            .require_if_present(self.phone.as_deref(), "phone cannot be empty")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_branch_wire_names() {
        let branch: Branch = serde_json::from_value(json!({
            "idSucursal": 3,
            "nombreSucursal": "Centro",
            "ciudad": "Puebla",
            "direccion": "Av. Reforma 1",
            "telefono": "222-000"
        }))
        .unwrap();
        assert_eq!(branch.id, "3");
        assert_eq!(branch.city, "Puebla");
    }

    #[test]
    fn test_create_requires_every_field() {
        let partial = BranchCreate {
            name: "Centro".into(),
            city: "Puebla".into(),
            ..Default::default()
        };
        assert_eq!(
            partial.validate().errors,
            vec!["address is required".to_string(), "phone is required".to_string()]
        );
    }
}
