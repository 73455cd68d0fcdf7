//! Maintenance schedule view and the read-only store contract
//!
//! Maintenance records are stored schema-less; the core only ever reads the
//! two fields that drive alerting, so this view exposes exactly those plus
//! the identifiers needed to reference the record.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::DomainResult;

/// Maintenance record status as read from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceStatus {
    Pending,
    Completed,
    /// Any status string this core does not interpret
    Other(String),
}

impl MaintenanceStatus {
    pub fn parse(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "completed" => Self::Completed,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }
}

/// Read view of a maintenance record, restricted to the fields the
/// classifier consumes
#[derive(Debug, Clone)]
pub struct MaintenanceSchedule {
    pub id: String,
    pub equipment_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub status: MaintenanceStatus,
}

/// Read-only maintenance store contract
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// All records whose status is not `completed`, in insertion order.
    async fn list_active(&self) -> DomainResult<Vec<MaintenanceSchedule>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_round_trips() {
        assert_eq!(MaintenanceStatus::parse("pending"), MaintenanceStatus::Pending);
        assert_eq!(
            MaintenanceStatus::parse("completed"),
            MaintenanceStatus::Completed
        );
        assert_eq!(
            MaintenanceStatus::parse("in_progress"),
            MaintenanceStatus::Other("in_progress".to_string())
        );
        assert_eq!(MaintenanceStatus::parse("in_progress").as_str(), "in_progress");
    }

    #[test]
    fn only_completed_counts_as_completed() {
        assert!(MaintenanceStatus::Completed.is_completed());
        assert!(!MaintenanceStatus::Pending.is_completed());
        assert!(!MaintenanceStatus::Other("done".into()).is_completed());
    }
}
