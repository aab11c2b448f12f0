use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use sea_orm::{DatabaseConnection, TransactionTrait};
use ulid::Ulid;

use crate::domain::{
    self,
    equipment::{EquipmentEntry, EquipmentService},
};

pub(crate) use crate::domain::equipment::{
    EquipmentDetailDraft, EquipmentDraft, EquipmentUpdate, ParameterDraft, ParameterValueAppend,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait EquipmentUseCase {
    async fn register(&self, department_id: Ulid, draft: EquipmentDraft) -> Result<EquipmentEntry>;
    async fn update(&self, department_id: Ulid, equipment_id: Ulid, update: EquipmentUpdate)
        -> Result<EquipmentEntry>;
    async fn inactivate(&self, department_id: Ulid, equipment_id: Ulid) -> Result<()>;
    async fn soft_delete(&self, department_id: Ulid, equipment_id: Ulid) -> Result<()>;
}

pub(crate) struct EquipmentUseCaseImpl {
    database_connection: Arc<DatabaseConnection>,
    equipment_service: Arc<dyn EquipmentService + Sync + Send>,
}

impl EquipmentUseCaseImpl {
    pub fn new(
        database_connection: Arc<DatabaseConnection>,
        equipment_service: Arc<dyn EquipmentService + Sync + Send>,
    ) -> Self {
        Self { database_connection, equipment_service }
    }

    // echo projection runs after the write transaction committed
    async fn project(&self, department_id: Ulid, equipment_id: Ulid) -> Result<EquipmentEntry> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        let entry = self.equipment_service.get(&transaction, department_id, equipment_id).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        Ok(entry)
    }
}

#[async_trait]
impl EquipmentUseCase for EquipmentUseCaseImpl {
    async fn register(&self, department_id: Ulid, draft: EquipmentDraft) -> Result<EquipmentEntry> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        let equipment_id = self.equipment_service.create(&transaction, department_id, draft).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        self.project(department_id, equipment_id).await
    }

    async fn update(
        &self,
        department_id: Ulid,
        equipment_id: Ulid,
        update: EquipmentUpdate,
    ) -> Result<EquipmentEntry> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        self.equipment_service.update(&transaction, department_id, equipment_id, update).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        self.project(department_id, equipment_id).await
    }

    async fn inactivate(&self, department_id: Ulid, equipment_id: Ulid) -> Result<()> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        self.equipment_service.inactivate(&transaction, department_id, equipment_id).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        Ok(())
    }

    async fn soft_delete(&self, department_id: Ulid, equipment_id: Ulid) -> Result<()> {
        let transaction = self.database_connection.begin().await.map_err(|e| Error::Anyhow(e.into()))?;
        self.equipment_service.soft_delete(&transaction, department_id, equipment_id).await?;
        transaction.commit().await.map_err(|e| Error::Anyhow(e.into()))?;

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("Department not found")]
    DepartmentNotExists,
    #[error("Equipment not found")]
    EquipmentNotExists,
    #[error("Parameter id is required for update")]
    ParameterIdRequired,
    #[error("Parameter({entered_parameter_id}) not found under equipment")]
    ParameterNotExists { entered_parameter_id: Ulid },
    #[error("parameter_values must contain at least one entry for parameter({parameter})")]
    EmptyParameterValues { parameter: String },
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl From<domain::equipment::Error> for Error {
    fn from(value: domain::equipment::Error) -> Self {
        match value {
            domain::equipment::Error::DepartmentNotExists => Self::DepartmentNotExists,
            domain::equipment::Error::EquipmentNotExists => Self::EquipmentNotExists,
            domain::equipment::Error::ParameterIdRequired => Self::ParameterIdRequired,
            domain::equipment::Error::ParameterNotExists { entered_parameter_id } => {
                Self::ParameterNotExists { entered_parameter_id }
            }
            domain::equipment::Error::EmptyParameterValues { parameter } => Self::EmptyParameterValues { parameter },
            domain::equipment::Error::Anyhow(e) => Self::Anyhow(e),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use sea_orm::{DatabaseBackend, MockDatabase};
    use ulid::Ulid;

    use super::{EquipmentDraft, EquipmentUpdate, EquipmentUseCase, EquipmentUseCaseImpl, Error};
    use crate::domain::{
        self,
        equipment::{EquipmentEntry, MockEquipmentService},
    };

    fn empty_entry(equipment_id: Ulid) -> EquipmentEntry {
        EquipmentEntry {
            id: equipment_id,
            equipment_name: "MRI".to_owned(),
            is_active: true,
            details: vec![],
            parameters: vec![],
        }
    }

    #[tokio::test]
    async fn when_registering_equipment_then_equipment_use_case_returns_projected_entry_ok() {
        let equipment_id = Ulid::new();

        let mock_database = MockDatabase::new(DatabaseBackend::Postgres);
        let mock_connection = Arc::new(mock_database.into_connection());

        let mut mock_equipment_service = MockEquipmentService::new();
        mock_equipment_service.expect_create().times(1).returning(move |_, _, _| Ok(equipment_id));
        mock_equipment_service
            .expect_get()
            .times(1)
            .returning(move |_, _, requested_equipment_id| Ok(empty_entry(requested_equipment_id)));

        let equipment_use_case = EquipmentUseCaseImpl::new(mock_connection, Arc::new(mock_equipment_service));

        let draft =
            EquipmentDraft { equipment_name: "MRI".to_owned(), is_active: true, details: vec![], parameters: vec![] };

        let entry =
            equipment_use_case.register(Ulid::new(), draft).await.expect("registering equipment should be successful");

        assert_eq!(entry.id, equipment_id);
    }

    #[tokio::test]
    async fn when_updating_equipment_is_rejected_then_equipment_use_case_skips_projection() {
        let mock_database = MockDatabase::new(DatabaseBackend::Postgres);
        let mock_connection = Arc::new(mock_database.into_connection());

        let mut mock_equipment_service = MockEquipmentService::new();
        mock_equipment_service
            .expect_update()
            .times(1)
            .returning(|_, _, _, _| Err(domain::equipment::Error::ParameterIdRequired));
        mock_equipment_service.expect_get().never();

        let equipment_use_case = EquipmentUseCaseImpl::new(mock_connection, Arc::new(mock_equipment_service));

        let update = EquipmentUpdate { equipment_name: None, is_active: None, details: vec![], parameters: vec![] };

        let result = equipment_use_case.update(Ulid::new(), Ulid::new(), update).await;

        assert!(matches!(result, Err(Error::ParameterIdRequired)));
    }

    #[tokio::test]
    async fn when_soft_deleting_missing_equipment_then_equipment_use_case_returns_equipment_not_exists_error() {
        let mock_database = MockDatabase::new(DatabaseBackend::Postgres);
        let mock_connection = Arc::new(mock_database.into_connection());

        let mut mock_equipment_service = MockEquipmentService::new();
        mock_equipment_service
            .expect_soft_delete()
            .times(1)
            .returning(|_, _, _| Err(domain::equipment::Error::EquipmentNotExists));

        let equipment_use_case = EquipmentUseCaseImpl::new(mock_connection, Arc::new(mock_equipment_service));

        let result = equipment_use_case.soft_delete(Ulid::new(), Ulid::new()).await;

        assert!(matches!(result, Err(Error::EquipmentNotExists)));
    }

    #[tokio::test]
    async fn when_inactivating_equipment_then_equipment_use_case_returns_ok() {
        let mock_database = MockDatabase::new(DatabaseBackend::Postgres);
        let mock_connection = Arc::new(mock_database.into_connection());

        let mut mock_equipment_service = MockEquipmentService::new();
        mock_equipment_service.expect_inactivate().times(1).returning(|_, _, _| Ok(()));

        let equipment_use_case = EquipmentUseCaseImpl::new(mock_connection, Arc::new(mock_equipment_service));

        equipment_use_case
            .inactivate(Ulid::new(), Ulid::new())
            .await
            .expect("inactivating equipment should be successful");
    }
}
