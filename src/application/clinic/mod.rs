use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sea_orm::{DatabaseConnection, TransactionTrait};
use ulid::Ulid;

use crate::domain::{
    self,
    clinic::{ClinicEntry, ClinicService},
};

pub(crate) use crate::domain::clinic::{ClinicDraft, DepartmentDraft};

/// Clinic write operations run in one transaction; the echoed tree is
/// projected in a fresh transaction after commit so the response reflects
/// committed state.
#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait ClinicUseCase {
    async fn register(&self, draft: ClinicDraft) -> Result<ClinicEntry>;
    async fn replace(&self, clinic_id: Ulid, draft: ClinicDraft) -> Result<ClinicEntry>;
    async fn get(&self, clinic_id: Ulid) -> Result<ClinicEntry>;
}

pub(crate) struct ClinicUseCaseImpl {
    database_connection: Arc<DatabaseConnection>,
    clinic_service: Arc<dyn ClinicService + Sync + Send>,
}

impl ClinicUseCaseImpl {
    pub fn new(
        database_connection: Arc<DatabaseConnection>,
        clinic_service: Arc<dyn ClinicService + Sync + Send>,
    ) -> Self {
        Self { database_connection, clinic_service }
    }

    async fn project(&self, clinic_id: Ulid) -> Result<ClinicEntry> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        let entry = self.clinic_service.get(&transaction, clinic_id).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        Ok(entry)
    }
}

#[async_trait]
impl ClinicUseCase for ClinicUseCaseImpl {
    async fn register(&self, draft: ClinicDraft) -> Result<ClinicEntry> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        let clinic_id = self.clinic_service.create(&transaction, draft).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        self.project(clinic_id).await
    }

    async fn replace(&self, clinic_id: Ulid, draft: ClinicDraft) -> Result<ClinicEntry> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        self.clinic_service.replace(&transaction, clinic_id, draft).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        self.project(clinic_id).await
    }

    async fn get(&self, clinic_id: Ulid) -> Result<ClinicEntry> {
        self.project(clinic_id).await
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("Clinic not found")]
    ClinicNotExists,
    #[error("parameter_values must contain at least one entry for parameter({parameter})")]
    EmptyParameterValues { parameter: String },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<domain::clinic::Error> for Error {
    fn from(value: domain::clinic::Error) -> Self {
        match value {
            domain::clinic::Error::ClinicNotExists => Self::ClinicNotExists,
            domain::clinic::Error::EmptyParameterValues { parameter } => Self::EmptyParameterValues { parameter },
            domain::clinic::Error::Anyhow(e) => Self::Anyhow(e),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
