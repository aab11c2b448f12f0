use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};
use serde_json::Value as JsonValue;
use tracing::info;
use ulid::Ulid;

use crate::database::{department, equipment, equipment_detail, parameter, parameter_value, UlidId};

/// Write payload for a new equipment row and its children. `normalize` must
/// run before any row is inserted: it folds the `format` alias into the value
/// list and rejects parameters that would end up with no value history.
pub(crate) struct EquipmentDraft {
    pub equipment_name: String,
    pub is_active: bool,
    pub details: Vec<EquipmentDetailDraft>,
    pub parameters: Vec<ParameterDraft>,
}

pub(crate) struct EquipmentDetailDraft {
    pub equipment_num: String,
    pub make: String,
    pub model: String,
    pub is_active: bool,
}

pub(crate) struct ParameterDraft {
    pub parameter_name: String,
    pub is_active: bool,
    pub values: Vec<JsonValue>,
    pub format: Option<JsonValue>,
}

/// Partial update for an existing equipment row. Scalar fields absent from the
/// payload keep their current value; details and parameter values are only
/// ever appended, never rewritten.
pub(crate) struct EquipmentUpdate {
    pub equipment_name: Option<String>,
    pub is_active: Option<bool>,
    pub details: Vec<EquipmentDetailDraft>,
    pub parameters: Vec<ParameterValueAppend>,
}

pub(crate) struct ParameterValueAppend {
    pub id: Option<Ulid>,
    pub values: Vec<JsonValue>,
}

pub(crate) struct EquipmentEntry {
    pub id: Ulid,
    pub equipment_name: String,
    pub is_active: bool,
    pub details: Vec<EquipmentDetailEntry>,
    pub parameters: Vec<ParameterEntry>,
}

pub(crate) struct EquipmentDetailEntry {
    pub id: Ulid,
    pub equipment_num: String,
    pub make: String,
    pub model: String,
    pub is_active: bool,
}

pub(crate) struct ParameterEntry {
    pub id: Ulid,
    pub parameter_name: String,
    pub is_active: bool,
    pub values: Vec<ParameterValueEntry>,
}

pub(crate) struct ParameterValueEntry {
    pub id: Ulid,
    pub content: JsonValue,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl ParameterDraft {
    fn normalize(mut self) -> Result<Self> {
        if self.values.is_empty() {
            match self.format.take() {
                Some(format) => self.values.push(format),
                None => return Err(Error::EmptyParameterValues { parameter: self.parameter_name }),
            }
        }
        // format only stands in for a missing value list
        self.format = None;
        Ok(self)
    }
}

impl EquipmentDraft {
    pub(crate) fn normalize(mut self) -> Result<Self> {
        self.parameters = self.parameters.into_iter().map(ParameterDraft::normalize).collect::<Result<Vec<_>>>()?;
        Ok(self)
    }
}

impl EquipmentUpdate {
    fn validate(&self) -> Result<()> {
        for append in &self.parameters {
            append.id.ok_or(Error::ParameterIdRequired)?;
        }

        Ok(())
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub(crate) trait EquipmentService {
    async fn create(&self, transaction: &DatabaseTransaction, department_id: Ulid, draft: EquipmentDraft)
        -> Result<Ulid>;
    async fn update(
        &self,
        transaction: &DatabaseTransaction,
        department_id: Ulid,
        equipment_id: Ulid,
        update: EquipmentUpdate,
    ) -> Result<()>;
    async fn get(&self, transaction: &DatabaseTransaction, department_id: Ulid, equipment_id: Ulid)
        -> Result<EquipmentEntry>;
    async fn inactivate(&self, transaction: &DatabaseTransaction, department_id: Ulid, equipment_id: Ulid)
        -> Result<()>;
    async fn soft_delete(&self, transaction: &DatabaseTransaction, department_id: Ulid, equipment_id: Ulid)
        -> Result<()>;
}

pub(crate) struct PostgresEquipmentService {}

#[async_trait]
impl EquipmentService for PostgresEquipmentService {
    async fn create(
        &self,
        transaction: &DatabaseTransaction,
        department_id: Ulid,
        draft: EquipmentDraft,
    ) -> Result<Ulid> {
        // resolve the parent before judging the payload, absence wins over validation
        let department = department::Entity::find()
            .filter(department::Column::Id.eq(UlidId::from(department_id)))
            .one(transaction)
            .await?
            .ok_or(Error::DepartmentNotExists)?;

        let draft = draft.normalize()?;

        let equipment_id = insert_equipment(transaction, department.id, draft).await?;
        info!("equipment({equipment_id}) created under department({department_id}).");

        Ok(equipment_id.inner())
    }

    async fn update(
        &self,
        transaction: &DatabaseTransaction,
        department_id: Ulid,
        equipment_id: Ulid,
        update: EquipmentUpdate,
    ) -> Result<()> {
        let equipment = find_owned_equipment(transaction, department_id, equipment_id).await?;
        update.validate()?;

        let equipment_id = equipment.id;

        if update.equipment_name.is_some() || update.is_active.is_some() {
            let mut active_equipment: equipment::ActiveModel = equipment.into();
            if let Some(equipment_name) = update.equipment_name {
                active_equipment.equipment_name = ActiveValue::Set(equipment_name);
            }
            if let Some(is_active) = update.is_active {
                active_equipment.is_active = ActiveValue::Set(is_active);
            }
            active_equipment.updated_at = ActiveValue::Set(Utc::now());
            active_equipment.update(transaction).await?;
        }

        for detail in update.details {
            insert_detail(transaction, equipment_id, detail).await?;
        }

        for append in update.parameters {
            let entered_parameter_id = append.id.ok_or(Error::ParameterIdRequired)?;

            let parameter = parameter::Entity::find()
                .filter(parameter::Column::Id.eq(UlidId::from(entered_parameter_id)))
                .filter(parameter::Column::EquipmentId.eq(equipment_id))
                .one(transaction)
                .await?
                .ok_or(Error::ParameterNotExists { entered_parameter_id })?;

            // named after lookup so the rejection carries the parameter name,
            // same as the create path
            if append.values.is_empty() {
                return Err(Error::EmptyParameterValues { parameter: parameter.parameter_name });
            }

            for content in append.values {
                insert_value(transaction, parameter.id, content).await?;
            }
        }

        Ok(())
    }

    async fn get(
        &self,
        transaction: &DatabaseTransaction,
        department_id: Ulid,
        equipment_id: Ulid,
    ) -> Result<EquipmentEntry> {
        let equipment = find_owned_equipment(transaction, department_id, equipment_id).await?;

        let mut entries = load_equipment_entries(transaction, vec![equipment]).await?;
        match entries.pop() {
            Some((_, entry)) => Ok(entry),
            None => Err(Error::Anyhow(anyhow::anyhow!("equipment projection returned no entry"))),
        }
    }

    async fn inactivate(
        &self,
        transaction: &DatabaseTransaction,
        department_id: Ulid,
        equipment_id: Ulid,
    ) -> Result<()> {
        let equipment = find_owned_equipment(transaction, department_id, equipment_id).await?;

        let mut active_equipment: equipment::ActiveModel = equipment.into();
        active_equipment.is_active = ActiveValue::Set(false);
        active_equipment.updated_at = ActiveValue::Set(Utc::now());
        active_equipment.update(transaction).await?;

        info!("equipment({equipment_id}) marked inactive.");

        Ok(())
    }

    async fn soft_delete(
        &self,
        transaction: &DatabaseTransaction,
        department_id: Ulid,
        equipment_id: Ulid,
    ) -> Result<()> {
        // already soft-deleted rows are treated as absent
        let equipment = equipment::Entity::find()
            .filter(equipment::Column::Id.eq(UlidId::from(equipment_id)))
            .filter(equipment::Column::DepartmentId.eq(UlidId::from(department_id)))
            .filter(equipment::Column::IsDeleted.eq(false))
            .one(transaction)
            .await?
            .ok_or(Error::EquipmentNotExists)?;

        let mut active_equipment: equipment::ActiveModel = equipment.into();
        active_equipment.is_deleted = ActiveValue::Set(true);
        active_equipment.is_active = ActiveValue::Set(false);
        active_equipment.updated_at = ActiveValue::Set(Utc::now());
        active_equipment.update(transaction).await?;

        info!("equipment({equipment_id}) soft deleted.");

        Ok(())
    }
}

async fn find_owned_equipment(
    transaction: &DatabaseTransaction,
    department_id: Ulid,
    equipment_id: Ulid,
) -> Result<equipment::Model> {
    equipment::Entity::find()
        .filter(equipment::Column::Id.eq(UlidId::from(equipment_id)))
        .filter(equipment::Column::DepartmentId.eq(UlidId::from(department_id)))
        .one(transaction)
        .await?
        .ok_or(Error::EquipmentNotExists)
}

/// Inserts an equipment row with its details, parameters and initial value
/// history. The draft must already be normalized.
pub(crate) async fn insert_equipment(
    transaction: &DatabaseTransaction,
    department_id: UlidId,
    draft: EquipmentDraft,
) -> Result<UlidId> {
    let now = Utc::now();
    let equipment = equipment::ActiveModel {
        id: ActiveValue::Set(Ulid::new().into()),
        department_id: ActiveValue::Set(department_id),
        equipment_name: ActiveValue::Set(draft.equipment_name),
        is_active: ActiveValue::Set(draft.is_active),
        is_deleted: ActiveValue::Set(false),
        created_at: ActiveValue::Set(now),
        updated_at: ActiveValue::Set(now),
    }
    .insert(transaction)
    .await?;

    for detail in draft.details {
        insert_detail(transaction, equipment.id, detail).await?;
    }
    for parameter in draft.parameters {
        insert_parameter(transaction, equipment.id, parameter).await?;
    }

    Ok(equipment.id)
}

async fn insert_detail(
    transaction: &DatabaseTransaction,
    equipment_id: UlidId,
    draft: EquipmentDetailDraft,
) -> Result<()> {
    equipment_detail::ActiveModel {
        id: ActiveValue::Set(Ulid::new().into()),
        equipment_id: ActiveValue::Set(equipment_id),
        equipment_num: ActiveValue::Set(draft.equipment_num),
        make: ActiveValue::Set(draft.make),
        model: ActiveValue::Set(draft.model),
        is_active: ActiveValue::Set(draft.is_active),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(transaction)
    .await?;

    Ok(())
}

async fn insert_parameter(
    transaction: &DatabaseTransaction,
    equipment_id: UlidId,
    draft: ParameterDraft,
) -> Result<()> {
    let parameter = parameter::ActiveModel {
        id: ActiveValue::Set(Ulid::new().into()),
        equipment_id: ActiveValue::Set(equipment_id),
        parameter_name: ActiveValue::Set(draft.parameter_name),
        is_active: ActiveValue::Set(draft.is_active),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(transaction)
    .await?;

    for content in draft.values {
        insert_value(transaction, parameter.id, content).await?;
    }

    Ok(())
}

async fn insert_value(transaction: &DatabaseTransaction, parameter_id: UlidId, content: JsonValue) -> Result<()> {
    parameter_value::ActiveModel {
        id: ActiveValue::Set(Ulid::new().into()),
        parameter_id: ActiveValue::Set(parameter_id),
        content: ActiveValue::Set(content),
        is_deleted: ActiveValue::Set(false),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(transaction)
    .await?;

    Ok(())
}

/// Loads the equipment rows visible under the given departments (soft-deleted
/// rows excluded) together with their projected children.
pub(crate) async fn load_visible_by_departments(
    transaction: &DatabaseTransaction,
    department_ids: &[UlidId],
) -> Result<Vec<(UlidId, EquipmentEntry)>> {
    if department_ids.is_empty() {
        return Ok(vec![]);
    }

    let equipments = equipment::Entity::find()
        .filter(equipment::Column::DepartmentId.is_in(department_ids.to_vec()))
        .filter(equipment::Column::IsDeleted.eq(false))
        .all(transaction)
        .await?;

    load_equipment_entries(transaction, equipments).await
}

/// Deletes every equipment subtree under the given departments, bottom-up:
/// parameter values, parameters, details, then the equipment rows themselves.
pub(crate) async fn delete_by_departments(
    transaction: &DatabaseTransaction,
    department_ids: &[UlidId],
) -> Result<()> {
    if department_ids.is_empty() {
        return Ok(());
    }

    let equipments = equipment::Entity::find()
        .filter(equipment::Column::DepartmentId.is_in(department_ids.to_vec()))
        .all(transaction)
        .await?;
    if equipments.is_empty() {
        return Ok(());
    }
    let equipment_ids: Vec<UlidId> = equipments.iter().map(|equipment| equipment.id).collect();

    let parameters = parameter::Entity::find()
        .filter(parameter::Column::EquipmentId.is_in(equipment_ids.clone()))
        .all(transaction)
        .await?;
    let parameter_ids: Vec<UlidId> = parameters.iter().map(|parameter| parameter.id).collect();

    if !parameter_ids.is_empty() {
        parameter_value::Entity::delete_many()
            .filter(parameter_value::Column::ParameterId.is_in(parameter_ids.clone()))
            .exec(transaction)
            .await?;
        parameter::Entity::delete_many()
            .filter(parameter::Column::Id.is_in(parameter_ids))
            .exec(transaction)
            .await?;
    }

    equipment_detail::Entity::delete_many()
        .filter(equipment_detail::Column::EquipmentId.is_in(equipment_ids.clone()))
        .exec(transaction)
        .await?;
    equipment::Entity::delete_many()
        .filter(equipment::Column::Id.is_in(equipment_ids))
        .exec(transaction)
        .await?;

    Ok(())
}

/// Re-reads details, parameters and value history for the given equipment rows
/// and assembles the entries bottom-up. Children keep store return order; the
/// value history is never filtered, soft-deleted values stay visible.
async fn load_equipment_entries(
    transaction: &DatabaseTransaction,
    equipments: Vec<equipment::Model>,
) -> Result<Vec<(UlidId, EquipmentEntry)>> {
    if equipments.is_empty() {
        return Ok(vec![]);
    }
    let equipment_ids: Vec<UlidId> = equipments.iter().map(|equipment| equipment.id).collect();

    let details = equipment_detail::Entity::find()
        .filter(equipment_detail::Column::EquipmentId.is_in(equipment_ids.clone()))
        .all(transaction)
        .await?;
    let parameters = parameter::Entity::find()
        .filter(parameter::Column::EquipmentId.is_in(equipment_ids))
        .all(transaction)
        .await?;
    let parameter_ids: Vec<UlidId> = parameters.iter().map(|parameter| parameter.id).collect();

    let values = if parameter_ids.is_empty() {
        vec![]
    } else {
        parameter_value::Entity::find()
            .filter(parameter_value::Column::ParameterId.is_in(parameter_ids))
            .all(transaction)
            .await?
    };

    let mut values_by_parameter: HashMap<Ulid, Vec<ParameterValueEntry>> = HashMap::new();
    for value in values {
        values_by_parameter.entry(value.parameter_id.inner()).or_default().push(ParameterValueEntry {
            id: value.id.inner(),
            content: value.content,
            is_deleted: value.is_deleted,
            created_at: value.created_at,
        });
    }

    let mut parameters_by_equipment: HashMap<Ulid, Vec<ParameterEntry>> = HashMap::new();
    for parameter in parameters {
        let values = values_by_parameter.remove(&parameter.id.inner()).unwrap_or_default();
        parameters_by_equipment.entry(parameter.equipment_id.inner()).or_default().push(ParameterEntry {
            id: parameter.id.inner(),
            parameter_name: parameter.parameter_name,
            is_active: parameter.is_active,
            values,
        });
    }

    let mut details_by_equipment: HashMap<Ulid, Vec<EquipmentDetailEntry>> = HashMap::new();
    for detail in details {
        details_by_equipment.entry(detail.equipment_id.inner()).or_default().push(EquipmentDetailEntry {
            id: detail.id.inner(),
            equipment_num: detail.equipment_num,
            make: detail.make,
            model: detail.model,
            is_active: detail.is_active,
        });
    }

    Ok(equipments
        .into_iter()
        .map(|equipment| {
            let equipment_id = equipment.id.inner();
            let entry = EquipmentEntry {
                id: equipment_id,
                equipment_name: equipment.equipment_name,
                is_active: equipment.is_active,
                details: details_by_equipment.remove(&equipment_id).unwrap_or_default(),
                parameters: parameters_by_equipment.remove(&equipment_id).unwrap_or_default(),
            };
            (equipment.department_id, entry)
        })
        .collect())
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

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Anyhow(value.into())
    }
}

pub(crate) type Result<T> = std::result::Result<T, Error>;
