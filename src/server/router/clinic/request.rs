use serde::Deserialize;

use crate::server::router::equipment::request::EquipmentRequest;

/// The nested write document. `department` is singular in the wire format,
/// kept for compatibility with existing clients.
#[derive(Deserialize)]
pub(super) struct ClinicRequest {
    pub name: String,
    #[serde(default)]
    pub department: Vec<DepartmentRequest>,
}

#[derive(Deserialize)]
pub(super) struct DepartmentRequest {
    pub name: String,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub equipments: Vec<EquipmentRequest>,
}
