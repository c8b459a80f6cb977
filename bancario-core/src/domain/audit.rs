//! Audit metadata
//!
//! The backend names these fields in snake_case while every other field is
//! camelCase. The names below are part of the wire contract.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::wire;

/// Audit fields returned on every tracked record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditFields {
    #[serde(rename = "id_usuario_creacion", default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(rename = "id_usuario_edicion", default, skip_serializing_if = "Option::is_none")]
    pub edited_by: Option<String>,
    #[serde(
        rename = "fecha_creacion",
        default,
        with = "wire::timestamp_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<NaiveDateTime>,
    #[serde(
        rename = "fecha_actualizacion",
        default,
        with = "wire::timestamp_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<NaiveDateTime>,
}

/// Create payload stamped with the creating user
#[derive(Debug, Serialize)]
pub struct Created<'a, T: Serialize> {
    #[serde(flatten)]
    pub body: &'a T,
    pub id_usuario_creacion: &'a str,
}

/// Update payload stamped with the editing user
#[derive(Debug, Serialize)]
pub struct Edited<'a, T: Serialize> {
    #[serde(flatten)]
    pub body: &'a T,
    pub id_usuario_edicion: &'a str,
}
