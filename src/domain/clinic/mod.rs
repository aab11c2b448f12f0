use std::collections::HashMap;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};
use tracing::info;
use ulid::Ulid;

use crate::{
    database::{clinic, department, UlidId},
    domain::equipment::{self, EquipmentDraft, EquipmentEntry},
};

pub(crate) struct ClinicDraft {
    pub name: String,
    pub departments: Vec<DepartmentDraft>,
}

pub(crate) struct DepartmentDraft {
    pub name: String,
    pub is_active: bool,
    pub equipments: Vec<EquipmentDraft>,
}

pub(crate) struct ClinicEntry {
    pub id: Ulid,
    pub name: String,
    pub departments: Vec<DepartmentEntry>,
}

pub(crate) struct DepartmentEntry {
    pub id: Ulid,
    pub name: String,
    pub is_active: bool,
    pub equipments: Vec<EquipmentEntry>,
}

impl DepartmentDraft {
    fn normalize(mut self) -> Result<Self> {
        self.equipments = self
            .equipments
            .into_iter()
            .map(|equipment| equipment.normalize().map_err(Error::from))
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }
}

impl ClinicDraft {
    /// Normalizes every equipment draft in the tree before a single row is
    /// written, so a rejected payload leaves no partial subtree behind.
    fn normalize(mut self) -> Result<Self> {
        self.departments =
            self.departments.into_iter().map(DepartmentDraft::normalize).collect::<Result<Vec<_>>>()?;
        Ok(self)
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait ClinicService {
    async fn create(&self, transaction: &DatabaseTransaction, draft: ClinicDraft) -> Result<Ulid>;
    async fn replace(&self, transaction: &DatabaseTransaction, clinic_id: Ulid, draft: ClinicDraft) -> Result<()>;
    async fn get(&self, transaction: &DatabaseTransaction, clinic_id: Ulid) -> Result<ClinicEntry>;
}

pub(crate) struct PostgresClinicService {}

#[async_trait]
impl ClinicService for PostgresClinicService {
    async fn create(&self, transaction: &DatabaseTransaction, draft: ClinicDraft) -> Result<Ulid> {
        let draft = draft.normalize()?;

        let now = Utc::now();
        let clinic = clinic::ActiveModel {
            id: ActiveValue::Set(Ulid::new().into()),
            name: ActiveValue::Set(draft.name),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(transaction)
        .await?;

        insert_departments(transaction, clinic.id, draft.departments).await?;
        info!("clinic({}) created.", clinic.id);

        Ok(clinic.id.inner())
    }

    async fn replace(&self, transaction: &DatabaseTransaction, clinic_id: Ulid, draft: ClinicDraft) -> Result<()> {
        // absence of the clinic wins over payload validation
        let clinic = clinic::Entity::find()
            .filter(clinic::Column::Id.eq(UlidId::from(clinic_id)))
            .one(transaction)
            .await?
            .ok_or(Error::ClinicNotExists)?;
        let clinic_id = clinic.id;

        let ClinicDraft { name, departments } = draft.normalize()?;

        let current_departments =
            department::Entity::find().filter(department::Column::ClinicId.eq(clinic_id)).all(transaction).await?;
        let department_ids: Vec<UlidId> = current_departments.iter().map(|department| department.id).collect();

        // existing subtrees go away wholesale, bottom-up
        equipment::delete_by_departments(transaction, &department_ids).await?;
        if !department_ids.is_empty() {
            department::Entity::delete_many()
                .filter(department::Column::Id.is_in(department_ids))
                .exec(transaction)
                .await?;
        }

        let mut active_clinic: clinic::ActiveModel = clinic.into();
        active_clinic.name = ActiveValue::Set(name);
        active_clinic.updated_at = ActiveValue::Set(Utc::now());
        active_clinic.update(transaction).await?;

        insert_departments(transaction, clinic_id, departments).await?;
        info!("clinic({clinic_id}) replaced.");

        Ok(())
    }

    async fn get(&self, transaction: &DatabaseTransaction, clinic_id: Ulid) -> Result<ClinicEntry> {
        let clinic = clinic::Entity::find()
            .filter(clinic::Column::Id.eq(UlidId::from(clinic_id)))
            .one(transaction)
            .await?
            .ok_or(Error::ClinicNotExists)?;

        let departments =
            department::Entity::find().filter(department::Column::ClinicId.eq(clinic.id)).all(transaction).await?;
        let department_ids: Vec<UlidId> = departments.iter().map(|department| department.id).collect();

        let equipments = equipment::load_visible_by_departments(transaction, &department_ids).await?;
        let mut equipments_by_department: HashMap<Ulid, Vec<EquipmentEntry>> = HashMap::new();
        for (department_id, entry) in equipments {
            equipments_by_department.entry(department_id.inner()).or_default().push(entry);
        }

        let departments = departments
            .into_iter()
            .map(|department| DepartmentEntry {
                id: department.id.inner(),
                name: department.name,
                is_active: department.is_active,
                equipments: equipments_by_department.remove(&department.id.inner()).unwrap_or_default(),
            })
            .collect();

        Ok(ClinicEntry { id: clinic.id.inner(), name: clinic.name, departments })
    }
}

async fn insert_departments(
    transaction: &DatabaseTransaction,
    clinic_id: UlidId,
    departments: Vec<DepartmentDraft>,
) -> Result<()> {
    for draft in departments {
        let department = department::ActiveModel {
            id: ActiveValue::Set(Ulid::new().into()),
            clinic_id: ActiveValue::Set(clinic_id),
            name: ActiveValue::Set(draft.name),
            is_active: ActiveValue::Set(draft.is_active),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(transaction)
        .await?;

        for equipment_draft in draft.equipments {
            equipment::insert_equipment(transaction, department.id, equipment_draft).await?;
        }
    }

    Ok(())
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

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Anyhow(value.into())
    }
}

impl From<equipment::Error> for Error {
    fn from(value: equipment::Error) -> Self {
        match value {
            equipment::Error::EmptyParameterValues { parameter } => Self::EmptyParameterValues { parameter },
            equipment::Error::Anyhow(e) => Self::Anyhow(e),
            other => Self::Anyhow(other.into()),
        }
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use chrono::Utc;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult, TransactionTrait};
    use serde_json::json;
    use ulid::Ulid;

    use super::{ClinicDraft, ClinicService, DepartmentDraft, Error, PostgresClinicService};
    use crate::{
        database::{clinic, department, equipment, parameter, parameter_value, UlidId},
        domain::equipment::{EquipmentDraft, ParameterDraft},
    };

    fn clinic_model(id: UlidId, name: &str) -> clinic::Model {
        let now = Utc::now();
        clinic::Model { id, name: name.to_owned(), created_at: now, updated_at: now }
    }

    fn department_model(id: UlidId, clinic_id: UlidId, name: &str) -> department::Model {
        department::Model { id, clinic_id, name: name.to_owned(), is_active: true, created_at: Utc::now() }
    }

    fn equipment_model(id: UlidId, department_id: UlidId, name: &str) -> equipment::Model {
        let now = Utc::now();
        equipment::Model {
            id,
            department_id,
            equipment_name: name.to_owned(),
            is_active: true,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    fn parameter_model(id: UlidId, equipment_id: UlidId) -> parameter::Model {
        parameter::Model {
            id,
            equipment_id,
            parameter_name: "Speed".to_owned(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn exec_result() -> MockExecResult {
        MockExecResult { last_insert_id: 0, rows_affected: 1 }
    }

    #[tokio::test]
    async fn when_creating_clinic_then_clinic_service_returns_created_id_ok() {
        let clinic_id: UlidId = Ulid::new().into();
        let department_id: UlidId = Ulid::new().into();
        let equipment_id: UlidId = Ulid::new().into();
        let parameter_id: UlidId = Ulid::new().into();

        let mock_database = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![clinic_model(clinic_id, "City Clinic")]])
            .append_query_results([vec![department_model(department_id, clinic_id, "Radiology")]])
            .append_query_results([vec![equipment_model(equipment_id, department_id, "MRI")]])
            .append_query_results([vec![parameter_model(parameter_id, equipment_id)]])
            .append_query_results([vec![parameter_value::Model {
                id: Ulid::new().into(),
                parameter_id,
                content: json!({"unit": "rpm"}),
                is_deleted: false,
                created_at: Utc::now(),
            }]]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let draft = ClinicDraft {
            name: "City Clinic".to_owned(),
            departments: vec![DepartmentDraft {
                name: "Radiology".to_owned(),
                is_active: true,
                equipments: vec![EquipmentDraft {
                    equipment_name: "MRI".to_owned(),
                    is_active: true,
                    details: vec![],
                    parameters: vec![ParameterDraft {
                        parameter_name: "Speed".to_owned(),
                        is_active: true,
                        values: vec![json!({"unit": "rpm"})],
                        format: None,
                    }],
                }],
            }],
        };

        let result =
            clinic_service.create(&transaction, draft).await.expect("creating clinic should be successful");
        transaction.commit().await.expect("committing transaction should be successful");

        assert_eq!(result, clinic_id.inner());
    }

    #[tokio::test]
    async fn when_creating_clinic_with_empty_parameter_values_then_clinic_service_returns_empty_parameter_values_error()
    {
        let mock_database = MockDatabase::new(DatabaseBackend::Postgres);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let draft = ClinicDraft {
            name: "City Clinic".to_owned(),
            departments: vec![DepartmentDraft {
                name: "Radiology".to_owned(),
                is_active: true,
                equipments: vec![EquipmentDraft {
                    equipment_name: "MRI".to_owned(),
                    is_active: true,
                    details: vec![],
                    parameters: vec![ParameterDraft {
                        parameter_name: "Speed".to_owned(),
                        is_active: true,
                        values: vec![],
                        format: None,
                    }],
                }],
            }],
        };

        let result = clinic_service.create(&transaction, draft).await;

        assert!(matches!(result, Err(Error::EmptyParameterValues { parameter }) if parameter == "Speed"));
    }

    #[tokio::test]
    async fn when_replacing_clinic_then_clinic_service_deletes_old_subtree_and_recreates_ok() {
        let clinic_id: UlidId = Ulid::new().into();
        let old_department_id: UlidId = Ulid::new().into();
        let old_equipment_id: UlidId = Ulid::new().into();
        let old_parameter_id: UlidId = Ulid::new().into();
        let new_department_id: UlidId = Ulid::new().into();

        let mock_database = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![clinic_model(clinic_id, "City Clinic")]])
            .append_query_results([vec![department_model(old_department_id, clinic_id, "Radiology")]])
            .append_query_results([vec![equipment_model(old_equipment_id, old_department_id, "MRI")]])
            .append_query_results([vec![parameter_model(old_parameter_id, old_equipment_id)]])
            // values, parameters, details, equipments, departments
            .append_exec_results([exec_result(), exec_result(), exec_result(), exec_result(), exec_result()])
            .append_query_results([vec![clinic_model(clinic_id, "Renamed Clinic")]])
            .append_query_results([vec![department_model(new_department_id, clinic_id, "Cardiology")]]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let draft = ClinicDraft {
            name: "Renamed Clinic".to_owned(),
            departments: vec![DepartmentDraft { name: "Cardiology".to_owned(), is_active: true, equipments: vec![] }],
        };

        clinic_service
            .replace(&transaction, clinic_id.inner(), draft)
            .await
            .expect("replacing clinic should be successful");
        transaction.commit().await.expect("committing transaction should be successful");
    }

    #[tokio::test]
    async fn when_replacing_missing_clinic_then_clinic_service_returns_clinic_not_exists_error() {
        let mock_database =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([Vec::<clinic::Model>::new()]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let draft = ClinicDraft { name: "City Clinic".to_owned(), departments: vec![] };

        let result = clinic_service.replace(&transaction, Ulid::new(), draft).await;
        transaction.commit().await.expect("committing transaction should be successful");

        assert!(matches!(result, Err(Error::ClinicNotExists)));
    }

    #[tokio::test]
    async fn when_replacing_missing_clinic_with_malformed_parameter_then_clinic_service_returns_clinic_not_exists_error(
    ) {
        let mock_database =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([Vec::<clinic::Model>::new()]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let draft = ClinicDraft {
            name: "City Clinic".to_owned(),
            departments: vec![DepartmentDraft {
                name: "Radiology".to_owned(),
                is_active: true,
                equipments: vec![EquipmentDraft {
                    equipment_name: "MRI".to_owned(),
                    is_active: true,
                    details: vec![],
                    parameters: vec![ParameterDraft {
                        parameter_name: "Speed".to_owned(),
                        is_active: true,
                        values: vec![],
                        format: None,
                    }],
                }],
            }],
        };

        let result = clinic_service.replace(&transaction, Ulid::new(), draft).await;
        transaction.commit().await.expect("committing transaction should be successful");

        // the absent clinic wins over payload validation
        assert!(matches!(result, Err(Error::ClinicNotExists)));
    }

    #[tokio::test]
    async fn when_getting_clinic_then_clinic_service_returns_projected_tree_ok() {
        let clinic_id: UlidId = Ulid::new().into();
        let department_id: UlidId = Ulid::new().into();
        let equipment_id: UlidId = Ulid::new().into();
        let parameter_id: UlidId = Ulid::new().into();

        let mock_database = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![clinic_model(clinic_id, "City Clinic")]])
            .append_query_results([vec![department_model(department_id, clinic_id, "Radiology")]])
            .append_query_results([vec![equipment_model(equipment_id, department_id, "MRI")]])
            .append_query_results([Vec::<crate::database::equipment_detail::Model>::new()])
            .append_query_results([vec![parameter_model(parameter_id, equipment_id)]])
            .append_query_results([vec![parameter_value::Model {
                id: Ulid::new().into(),
                parameter_id,
                content: json!({"unit": "rpm"}),
                is_deleted: true,
                created_at: Utc::now(),
            }]]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let entry =
            clinic_service.get(&transaction, clinic_id.inner()).await.expect("getting clinic should be successful");
        transaction.commit().await.expect("committing transaction should be successful");

        assert_eq!(entry.id, clinic_id.inner());
        assert_eq!(entry.name, "City Clinic");
        assert_eq!(entry.departments.len(), 1);
        assert_eq!(entry.departments[0].name, "Radiology");
        assert_eq!(entry.departments[0].equipments.len(), 1);
        assert_eq!(entry.departments[0].equipments[0].equipment_name, "MRI");
        assert_eq!(entry.departments[0].equipments[0].parameters.len(), 1);
        // soft-deleted values stay in the history
        assert!(entry.departments[0].equipments[0].parameters[0].values[0].is_deleted);
    }

    #[tokio::test]
    async fn when_getting_clinic_then_clinic_service_excludes_soft_deleted_equipments_in_query() {
        let clinic_id: UlidId = Ulid::new().into();
        let department_id: UlidId = Ulid::new().into();

        let mock_database = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![clinic_model(clinic_id, "City Clinic")]])
            .append_query_results([vec![department_model(department_id, clinic_id, "Radiology")]])
            .append_query_results([Vec::<equipment::Model>::new()]);
        let mock_connection = mock_database.into_connection();

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");
        let entry =
            clinic_service.get(&transaction, clinic_id.inner()).await.expect("getting clinic should be successful");
        transaction.commit().await.expect("committing transaction should be successful");

        assert!(entry.departments[0].equipments.is_empty());

        // the equipment select must filter soft-deleted rows in SQL
        let transaction_log = format!("{:?}", mock_connection.into_transaction_log());
        assert!(transaction_log.contains("is_deleted"));
        assert!(transaction_log.contains("Bool(Some(false))"));
    }

    #[tokio::test]
    async fn when_getting_missing_clinic_then_clinic_service_returns_clinic_not_exists_error() {
        let mock_database =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([Vec::<clinic::Model>::new()]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let result = clinic_service.get(&transaction, Ulid::new()).await;
        transaction.commit().await.expect("committing transaction should be successful");

        assert!(matches!(result, Err(Error::ClinicNotExists)));
    }

    #[tokio::test]
    async fn when_creating_clinic_is_failed_then_clinic_service_returns_anyhow_err() {
        let mock_database = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Custom("some error".to_owned())]);
        let mock_connection = Arc::new(mock_database.into_connection());

        let clinic_service = PostgresClinicService {};

        let transaction = mock_connection.begin().await.expect("beginning transaction should be successful");

        let draft = ClinicDraft { name: "City Clinic".to_owned(), departments: vec![] };

        let result = clinic_service.create(&transaction, draft).await;
        transaction.commit().await.expect("committing transaction should be successful");

        assert!(matches!(result, Err(Error::Anyhow(_))));
        assert_eq!(result.err().unwrap().to_string(), "Custom Error: some error");
    }
}
