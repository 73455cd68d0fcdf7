//! Create maintenance table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_equipment::Equipment;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Maintenance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Maintenance::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Maintenance::EquipmentId).string().not_null())
                    .col(
                        ColumnDef::new(Maintenance::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenance::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Maintenance::Data).json().not_null())
                    .col(ColumnDef::new(Maintenance::CreatedBy).string().not_null())
                    .col(
                        ColumnDef::new(Maintenance::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Maintenance::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_maintenance_equipment")
                            .from(Maintenance::Table, Maintenance::EquipmentId)
                            .to(Equipment::Table, Equipment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_equipment_id")
                    .table(Maintenance::Table)
                    .col(Maintenance::EquipmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_status")
                    .table(Maintenance::Table)
                    .col(Maintenance::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_maintenance_scheduled_at")
                    .table(Maintenance::Table)
                    .col(Maintenance::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Maintenance::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Maintenance {
    Table,
    Id,
    EquipmentId,
    ScheduledAt,
    Status,
    Data,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
