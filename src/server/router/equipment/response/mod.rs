use axum::{http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;
use ulid::Ulid;

use crate::{
    application,
    domain::equipment::{EquipmentDetailEntry, EquipmentEntry, ParameterEntry, ParameterValueEntry},
    server::response::{error_payload, error_payload_with_data, handle_internal_server_error},
};

impl IntoResponse for application::equipment::Error {
    fn into_response(self) -> axum::response::Response {
        match self {
            application::equipment::Error::Anyhow(e) => handle_internal_server_error(&*e).into_response(),
            application::equipment::Error::DepartmentNotExists => {
                DepartmentNotExistsErrorResponse {}.into_response()
            }
            application::equipment::Error::EquipmentNotExists => EquipmentNotExistsErrorResponse {}.into_response(),
            application::equipment::Error::ParameterIdRequired => ParameterIdRequiredErrorResponse {}.into_response(),
            application::equipment::Error::ParameterNotExists { entered_parameter_id } => {
                ParameterNotExistsErrorResponse { entered_parameter_id }.into_response()
            }
            application::equipment::Error::EmptyParameterValues { parameter } => {
                EmptyParameterValuesErrorResponse { parameter }.into_response()
            }
        }
    }
}

struct DepartmentNotExistsErrorResponse {}

impl IntoResponse for DepartmentNotExistsErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::NOT_FOUND, error_payload("DEPARTMENT_NOT_FOUND", "Department not found")).into_response()
    }
}

struct EquipmentNotExistsErrorResponse {}

impl IntoResponse for EquipmentNotExistsErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::NOT_FOUND, error_payload("EQUIPMENT_NOT_FOUND", "Equipment not found")).into_response()
    }
}

struct ParameterIdRequiredErrorResponse {}

impl IntoResponse for ParameterIdRequiredErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::BAD_REQUEST,
            error_payload_with_data(
                "PARAMETER_ID_REQUIRED",
                "parameter id is required for update",
                FieldErrorData { field: "id" },
            ),
        )
            .into_response()
    }
}

struct ParameterNotExistsErrorResponse {
    entered_parameter_id: Ulid,
}

impl IntoResponse for ParameterNotExistsErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::BAD_REQUEST,
            error_payload_with_data(
                "PARAMETER_NOT_EXISTS",
                "entered parameter does not belong to the equipment",
                EnteredParameterIdErrorData { field: "id", entered_parameter_id: self.entered_parameter_id },
            ),
        )
            .into_response()
    }
}

pub(in crate::server::router) struct EmptyParameterValuesErrorResponse {
    pub parameter: String,
}

impl IntoResponse for EmptyParameterValuesErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::BAD_REQUEST,
            error_payload_with_data(
                "PARAMETER_VALUES_REQUIRED",
                "parameter_values must contain at least one entry",
                ParameterErrorData { field: "parameter_values", parameter: self.parameter },
            ),
        )
            .into_response()
    }
}

#[derive(Serialize, Debug)]
struct FieldErrorData {
    field: &'static str,
}

#[derive(Serialize, Debug)]
struct EnteredParameterIdErrorData {
    field: &'static str,
    entered_parameter_id: Ulid,
}

#[derive(Serialize, Debug)]
struct ParameterErrorData {
    field: &'static str,
    parameter: String,
}

#[derive(Serialize)]
pub(in crate::server::router) struct MessageResponse {
    pub message: &'static str,
}

#[derive(Serialize)]
pub(in crate::server::router) struct EquipmentResponse {
    pub id: Ulid,
    pub equipment_name: String,
    pub is_active: bool,
    pub equipment_details: Vec<EquipmentDetailResponse>,
    pub parameters: Vec<ParameterResponse>,
}

#[derive(Serialize)]
pub(in crate::server::router) struct EquipmentDetailResponse {
    pub id: Ulid,
    pub equipment_num: String,
    pub make: String,
    pub model: String,
    pub is_active: bool,
}

#[derive(Serialize)]
pub(in crate::server::router) struct ParameterResponse {
    pub id: Ulid,
    pub parameter_name: String,
    pub is_active: bool,
    pub parameter_values: Vec<ParameterValueResponse>,
}

#[derive(Serialize)]
pub(in crate::server::router) struct ParameterValueResponse {
    pub id: Ulid,
    pub content: JsonValue,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl From<EquipmentEntry> for EquipmentResponse {
    fn from(value: EquipmentEntry) -> Self {
        Self {
            id: value.id,
            equipment_name: value.equipment_name,
            is_active: value.is_active,
            equipment_details: value.details.into_iter().map(|detail| detail.into()).collect(),
            parameters: value.parameters.into_iter().map(|parameter| parameter.into()).collect(),
        }
    }
}

impl From<EquipmentDetailEntry> for EquipmentDetailResponse {
    fn from(value: EquipmentDetailEntry) -> Self {
        Self {
            id: value.id,
            equipment_num: value.equipment_num,
            make: value.make,
            model: value.model,
            is_active: value.is_active,
        }
    }
}

impl From<ParameterEntry> for ParameterResponse {
    fn from(value: ParameterEntry) -> Self {
        Self {
            id: value.id,
            parameter_name: value.parameter_name,
            is_active: value.is_active,
            parameter_values: value.values.into_iter().map(|v| v.into()).collect(),
        }
    }
}

impl From<ParameterValueEntry> for ParameterValueResponse {
    fn from(value: ParameterValueEntry) -> Self {
        Self { id: value.id, content: value.content, created_at: value.created_at, is_deleted: value.is_deleted }
    }
}
