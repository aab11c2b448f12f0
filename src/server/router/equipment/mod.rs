use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{patch, post, put},
    Json, Router,
};
use ulid::Ulid;

use crate::{
    application::{
        equipment::{
            self, EquipmentDetailDraft, EquipmentDraft, EquipmentUpdate, EquipmentUseCase, ParameterDraft,
            ParameterValueAppend,
        },
        Application,
    },
    server::response::Payload,
};

use self::{
    request::{EquipmentDetailRequest, EquipmentRequest, ParameterAppendRequest, ParameterRequest, PutEquipmentRequest},
    response::{EquipmentResponse, MessageResponse},
};

pub(in crate::server::router) mod request;
pub(in crate::server::router) mod response;

pub(crate) fn router(application: Arc<Application>) -> axum::Router {
    Router::new()
        .route("/departments/:department_id/equipments/", post(handle_post_equipment))
        .route("/departments/:department_id/equipments/:equipment_id/", put(handle_put_equipment))
        .route(
            "/departments/:department_id/equipments/:equipment_id/inactive/",
            patch(handle_patch_equipment_inactive),
        )
        .route(
            "/departments/:department_id/equipments/:equipment_id/delete/",
            patch(handle_delete_equipment).delete(handle_delete_equipment),
        )
        .with_state(application)
}

#[debug_handler]
async fn handle_post_equipment(
    Path(department_id): Path<Ulid>,
    State(application): State<Arc<Application>>,
    Payload(payload): Payload<EquipmentRequest>,
) -> Result<impl IntoResponse, equipment::Error> {
    let entry = application.equipment().register(department_id, payload.into()).await?;

    Ok((StatusCode::CREATED, Json(EquipmentResponse::from(entry))))
}

#[debug_handler]
async fn handle_put_equipment(
    Path((department_id, equipment_id)): Path<(Ulid, Ulid)>,
    State(application): State<Arc<Application>>,
    Payload(payload): Payload<PutEquipmentRequest>,
) -> Result<impl IntoResponse, equipment::Error> {
    let entry = application.equipment().update(department_id, equipment_id, payload.into()).await?;

    Ok((StatusCode::OK, Json(EquipmentResponse::from(entry))))
}

#[debug_handler]
async fn handle_patch_equipment_inactive(
    Path((department_id, equipment_id)): Path<(Ulid, Ulid)>,
    State(application): State<Arc<Application>>,
) -> Result<impl IntoResponse, equipment::Error> {
    application.equipment().inactivate(department_id, equipment_id).await?;

    Ok((StatusCode::OK, Json(MessageResponse { message: "Equipment marked as inactive" })))
}

#[debug_handler]
async fn handle_delete_equipment(
    Path((department_id, equipment_id)): Path<(Ulid, Ulid)>,
    State(application): State<Arc<Application>>,
) -> Result<impl IntoResponse, equipment::Error> {
    application.equipment().soft_delete(department_id, equipment_id).await?;

    Ok((StatusCode::OK, Json(MessageResponse { message: "Equipment soft deleted" })))
}

impl From<EquipmentRequest> for EquipmentDraft {
    fn from(value: EquipmentRequest) -> Self {
        Self {
            equipment_name: value.equipment_name,
            is_active: value.is_active.unwrap_or(true),
            details: value.equipment_details.into_iter().map(|detail| detail.into()).collect(),
            parameters: value.parameters.into_iter().map(|parameter| parameter.into()).collect(),
        }
    }
}

impl From<EquipmentDetailRequest> for EquipmentDetailDraft {
    fn from(value: EquipmentDetailRequest) -> Self {
        Self {
            equipment_num: value.equipment_num,
            make: value.make,
            model: value.model,
            is_active: value.is_active.unwrap_or(true),
        }
    }
}

impl From<ParameterRequest> for ParameterDraft {
    fn from(value: ParameterRequest) -> Self {
        Self {
            parameter_name: value.parameter_name,
            is_active: value.is_active.unwrap_or(true),
            values: value.parameter_values.into_iter().map(|v| v.content).collect(),
            format: value.format,
        }
    }
}

impl From<PutEquipmentRequest> for EquipmentUpdate {
    fn from(value: PutEquipmentRequest) -> Self {
        Self {
            equipment_name: value.equipment_name,
            is_active: value.is_active,
            details: value.equipment_details.into_iter().map(|detail| detail.into()).collect(),
            parameters: value.parameters.into_iter().map(|parameter| parameter.into()).collect(),
        }
    }
}

impl From<ParameterAppendRequest> for ParameterValueAppend {
    fn from(value: ParameterAppendRequest) -> Self {
        Self { id: value.id, values: value.parameter_values.into_iter().map(|v| v.content).collect() }
    }
}
