use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{
    DomainError, DomainResult, MaintenanceSchedule, MaintenanceStatus, MaintenanceStore,
};
use crate::infrastructure::database::entities::maintenance;

pub struct SeaOrmMaintenanceStore {
    db: DatabaseConnection,
}

impl SeaOrmMaintenanceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn model_to_schedule(model: maintenance::Model) -> MaintenanceSchedule {
    MaintenanceSchedule {
        id: model.id,
        equipment_id: model.equipment_id,
        scheduled_at: model.scheduled_at,
        status: MaintenanceStatus::parse(&model.status),
    }
}

#[async_trait]
impl MaintenanceStore for SeaOrmMaintenanceStore {
    async fn list_active(&self) -> DomainResult<Vec<MaintenanceSchedule>> {
        let models = maintenance::Entity::find()
            .filter(maintenance::Column::Status.ne("completed"))
            .order_by_asc(maintenance::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;

        Ok(models.into_iter().map(model_to_schedule).collect())
    }
}
