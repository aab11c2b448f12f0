use async_trait::async_trait;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveIden)]
pub enum Clinic {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Department {
    Table,
    Id,
    ClinicId,
    Name,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Equipment {
    Table,
    Id,
    DepartmentId,
    EquipmentName,
    IsActive,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum EquipmentDetail {
    Table,
    Id,
    EquipmentId,
    EquipmentNum,
    Make,
    Model,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Parameter {
    Table,
    Id,
    EquipmentId,
    ParameterName,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ParameterValue {
    Table,
    Id,
    ParameterId,
    Content,
    IsDeleted,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Clinic::Table)
                    .if_not_exists()
                    .col(char_len(Clinic::Id, 26).primary_key())
                    .col(string_len(Clinic::Name, 200))
                    .col(timestamp_with_time_zone(Clinic::CreatedAt))
                    .col(timestamp_with_time_zone(Clinic::UpdatedAt))
                    .take(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .col(char_len(Department::Id, 26).primary_key())
                    .col(char_len(Department::ClinicId, 26))
                    .col(string_len(Department::Name, 200))
                    .col(boolean(Department::IsActive))
                    .col(timestamp_with_time_zone(Department::CreatedAt))
                    .take(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Department::Table)
                    .if_not_exists()
                    .name("idx_department_clinic_id")
                    .col(Department::ClinicId)
                    .take(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .col(char_len(Equipment::Id, 26).primary_key())
                    .col(char_len(Equipment::DepartmentId, 26))
                    .col(string_len(Equipment::EquipmentName, 200))
                    .col(boolean(Equipment::IsActive))
                    .col(boolean(Equipment::IsDeleted))
                    .col(timestamp_with_time_zone(Equipment::CreatedAt))
                    .col(timestamp_with_time_zone(Equipment::UpdatedAt))
                    .take(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Equipment::Table)
                    .if_not_exists()
                    .name("idx_equipment_department_id")
                    .col(Equipment::DepartmentId)
                    .take(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(EquipmentDetail::Table)
                    .if_not_exists()
                    .col(char_len(EquipmentDetail::Id, 26).primary_key())
                    .col(char_len(EquipmentDetail::EquipmentId, 26))
                    .col(string_len(EquipmentDetail::EquipmentNum, 200))
                    .col(string_len(EquipmentDetail::Make, 100))
                    .col(string_len(EquipmentDetail::Model, 100))
                    .col(boolean(EquipmentDetail::IsActive))
                    .col(timestamp_with_time_zone(EquipmentDetail::CreatedAt))
                    .take(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(EquipmentDetail::Table)
                    .if_not_exists()
                    .name("idx_equipment_detail_equipment_id")
                    .col(EquipmentDetail::EquipmentId)
                    .take(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(Parameter::Table)
                    .if_not_exists()
                    .col(char_len(Parameter::Id, 26).primary_key())
                    .col(char_len(Parameter::EquipmentId, 26))
                    .col(string_len(Parameter::ParameterName, 200))
                    .col(boolean(Parameter::IsActive))
                    .col(timestamp_with_time_zone(Parameter::CreatedAt))
                    .take(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Parameter::Table)
                    .if_not_exists()
                    .name("idx_parameter_equipment_id")
                    .col(Parameter::EquipmentId)
                    .take(),
            )
            .await?;
        manager
            .create_table(
                Table::create()
                    .table(ParameterValue::Table)
                    .if_not_exists()
                    .col(char_len(ParameterValue::Id, 26).primary_key())
                    .col(char_len(ParameterValue::ParameterId, 26))
                    .col(json_binary(ParameterValue::Content))
                    .col(boolean(ParameterValue::IsDeleted))
                    .col(timestamp_with_time_zone(ParameterValue::CreatedAt))
                    .take(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(ParameterValue::Table)
                    .if_not_exists()
                    .name("idx_parameter_value_parameter_id")
                    .col(ParameterValue::ParameterId)
                    .take(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ParameterValue::Table).if_exists().take()).await?;
        manager.drop_table(Table::drop().table(Parameter::Table).if_exists().take()).await?;
        manager.drop_table(Table::drop().table(EquipmentDetail::Table).if_exists().take()).await?;
        manager.drop_table(Table::drop().table(Equipment::Table).if_exists().take()).await?;
        manager.drop_table(Table::drop().table(Department::Table).if_exists().take()).await?;
        manager.drop_table(Table::drop().table(Clinic::Table).if_exists().take()).await?;

        Ok(())
    }
}
