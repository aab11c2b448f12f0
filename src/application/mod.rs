use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::ApplicationConfig,
    database::{self, connect_to_database},
    domain::{
        clinic::{ClinicService, PostgresClinicService},
        equipment::{EquipmentService, PostgresEquipmentService},
    },
};

use self::{
    clinic::{ClinicUseCase, ClinicUseCaseImpl},
    equipment::{EquipmentUseCase, EquipmentUseCaseImpl},
};

pub(crate) mod clinic;
pub(crate) mod equipment;

pub(crate) struct Application {
    database_connection: Arc<DatabaseConnection>,
    clinic_service: Arc<dyn ClinicService + Sync + Send>,
    equipment_service: Arc<dyn EquipmentService + Sync + Send>,
}

impl Application {
    pub fn clinic(&self) -> impl ClinicUseCase {
        ClinicUseCaseImpl::new(self.database_connection.clone(), self.clinic_service.clone())
    }

    pub fn equipment(&self) -> impl EquipmentUseCase {
        EquipmentUseCaseImpl::new(self.database_connection.clone(), self.equipment_service.clone())
    }
}

pub(super) async fn init(config: &ApplicationConfig) -> anyhow::Result<Application> {
    let database_connection = init_database_connection(config).await?;
    database::migrate(database_connection.as_ref()).await?;

    Ok(Application {
        database_connection,
        clinic_service: Arc::new(PostgresClinicService {}),
        equipment_service: Arc::new(PostgresEquipmentService {}),
    })
}

async fn init_database_connection(config: &ApplicationConfig) -> anyhow::Result<Arc<DatabaseConnection>> {
    let database_config = &config.database;

    connect_to_database(
        &database_config.host,
        database_config.port,
        &database_config.database_name,
        &database_config.username,
        database_config.password.as_deref(),
    )
    .await
}
