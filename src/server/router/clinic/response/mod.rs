use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;
use ulid::Ulid;

use crate::{
    application,
    domain::clinic::{ClinicEntry, DepartmentEntry},
    domain::equipment::EquipmentEntry,
    server::{
        response::{error_payload, handle_internal_server_error},
        router::equipment::response::{EmptyParameterValuesErrorResponse, EquipmentDetailResponse, ParameterResponse},
    },
};

impl IntoResponse for application::clinic::Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            application::clinic::Error::Anyhow(e) => handle_internal_server_error(&*e).into_response(),
            application::clinic::Error::ClinicNotExists => ClinicNotExistsErrorResponse {}.into_response(),
            application::clinic::Error::EmptyParameterValues { parameter } => {
                EmptyParameterValuesErrorResponse { parameter }.into_response()
            }
        }
    }
}

struct ClinicNotExistsErrorResponse {}

impl IntoResponse for ClinicNotExistsErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::NOT_FOUND, error_payload("CLINIC_NOT_FOUND", "Clinic not found")).into_response()
    }
}

/// Read shape of the clinic tree. `department` mirrors the singular field
/// name of the write document; soft-deleted equipments are already filtered
/// out of the entries.
#[derive(Serialize)]
pub(super) struct ClinicResponse {
    pub id: Ulid,
    pub name: String,
    pub department: Vec<DepartmentResponse>,
}

#[derive(Serialize)]
pub(super) struct DepartmentResponse {
    pub id: Ulid,
    pub name: String,
    pub is_active: bool,
    pub equipments: Vec<EquipmentReadResponse>,
}

#[derive(Serialize)]
pub(super) struct EquipmentReadResponse {
    pub id: Ulid,
    pub equipment_name: String,
    pub equipment_details: Vec<EquipmentDetailResponse>,
    pub parameters: Vec<ParameterResponse>,
}

impl From<ClinicEntry> for ClinicResponse {
    fn from(value: ClinicEntry) -> Self {
        Self {
            id: value.id,
            name: value.name,
            department: value.departments.into_iter().map(|department| department.into()).collect(),
        }
    }
}

impl From<DepartmentEntry> for DepartmentResponse {
    fn from(value: DepartmentEntry) -> Self {
        Self {
            id: value.id,
            name: value.name,
            is_active: value.is_active,
            equipments: value.equipments.into_iter().map(|equipment| equipment.into()).collect(),
        }
    }
}

impl From<EquipmentEntry> for EquipmentReadResponse {
    fn from(value: EquipmentEntry) -> Self {
        Self {
            id: value.id,
            equipment_name: value.equipment_name,
            equipment_details: value.details.into_iter().map(|detail| detail.into()).collect(),
            parameters: value.parameters.into_iter().map(|parameter| parameter.into()).collect(),
        }
    }
}
