use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use ulid::Ulid;

use crate::{
    application::{
        clinic::{self, ClinicDraft, ClinicUseCase, DepartmentDraft},
        Application,
    },
    server::response::Payload,
};

use self::{
    request::{ClinicRequest, DepartmentRequest},
    response::ClinicResponse,
};

mod request;
mod response;

pub(crate) fn router(application: Arc<Application>) -> axum::Router {
    Router::new()
        .route("/clinics", post(handle_post_clinic))
        .route("/clinics/:clinic_id", put(handle_put_clinic))
        .route("/get_clinic/:clinic_id/", get(handle_get_clinic))
        .with_state(application)
}

#[debug_handler]
async fn handle_post_clinic(
    State(application): State<Arc<Application>>,
    Payload(payload): Payload<ClinicRequest>,
) -> Result<impl IntoResponse, clinic::Error> {
    let entry = application.clinic().register(payload.into()).await?;

    Ok((StatusCode::CREATED, Json(ClinicResponse::from(entry))))
}

#[debug_handler]
async fn handle_put_clinic(
    Path(clinic_id): Path<Ulid>,
    State(application): State<Arc<Application>>,
    Payload(payload): Payload<ClinicRequest>,
) -> Result<impl IntoResponse, clinic::Error> {
    let entry = application.clinic().replace(clinic_id, payload.into()).await?;

    Ok((StatusCode::OK, Json(ClinicResponse::from(entry))))
}

#[debug_handler]
async fn handle_get_clinic(
    Path(clinic_id): Path<Ulid>,
    State(application): State<Arc<Application>>,
) -> Result<impl IntoResponse, clinic::Error> {
    let entry = application.clinic().get(clinic_id).await?;

    Ok((StatusCode::OK, Json(ClinicResponse::from(entry))))
}

impl From<ClinicRequest> for ClinicDraft {
    fn from(value: ClinicRequest) -> Self {
        Self { name: value.name, departments: value.department.into_iter().map(|d| d.into()).collect() }
    }
}

impl From<DepartmentRequest> for DepartmentDraft {
    fn from(value: DepartmentRequest) -> Self {
        Self {
            name: value.name,
            is_active: value.is_active.unwrap_or(true),
            equipments: value.equipments.into_iter().map(|equipment| equipment.into()).collect(),
        }
    }
}
