//! Maintenance alerting
//!
//! Classifies maintenance records against a reference instant: anything
//! scheduled in the past and not completed is overdue; anything scheduled
//! within the lookahead window is upcoming. Notifications are derived on
//! every call and never persisted.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::config::AlertsConfig;
use crate::domain::MaintenanceSchedule;

/// Notification kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Overdue,
    Upcoming,
}

/// Notification priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    High,
    Medium,
}

/// A maintenance alert, freshly derived per request
///
/// The `id` is generated on each computation; it has no identity across
/// calls.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notification {
    /// Generated identifier (UUID, unique per computation)
    pub id: String,
    /// `overdue` or `upcoming`
    pub kind: NotificationKind,
    /// Short human-readable title
    pub title: String,
    /// Message referencing the maintenance record
    pub message: String,
    /// The record's scheduled date
    pub due_at: DateTime<Utc>,
    /// `high` for overdue, `medium` for upcoming
    pub priority: NotificationPriority,
}

/// Lookahead window derived from configuration
pub fn lookahead_window(cfg: &AlertsConfig) -> Duration {
    Duration::days(cfg.lookahead_days)
}

/// Classify `records` against `now`.
///
/// Returns all overdue notifications first, then all upcoming ones; within
/// each group the input order is preserved. Completed records never
/// produce a notification, regardless of date.
pub fn classify(
    now: DateTime<Utc>,
    records: &[MaintenanceSchedule],
    lookahead: Duration,
) -> Vec<Notification> {
    let horizon = now + lookahead;
    let mut overdue = Vec::new();
    let mut upcoming = Vec::new();

    for record in records {
        if record.status.is_completed() {
            continue;
        }

        if record.scheduled_at < now {
            overdue.push(Notification {
                id: uuid::Uuid::new_v4().to_string(),
                kind: NotificationKind::Overdue,
                title: "Maintenance overdue".to_string(),
                message: format!("Maintenance {} is past its scheduled date", record.id),
                due_at: record.scheduled_at,
                priority: NotificationPriority::High,
            });
        } else if record.scheduled_at <= horizon {
            upcoming.push(Notification {
                id: uuid::Uuid::new_v4().to_string(),
                kind: NotificationKind::Upcoming,
                title: "Maintenance due soon".to_string(),
                message: format!("Maintenance {} is approaching its scheduled date", record.id),
                due_at: record.scheduled_at,
                priority: NotificationPriority::Medium,
            });
        }
    }

    overdue.extend(upcoming);
    overdue
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::MaintenanceStatus;

    fn record(id: &str, scheduled_at: DateTime<Utc>, status: &str) -> MaintenanceSchedule {
        MaintenanceSchedule {
            id: id.to_string(),
            equipment_id: format!("eq-{id}"),
            scheduled_at,
            status: MaintenanceStatus::parse(status),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn partitions_overdue_and_upcoming() {
        let now = date(2024, 6, 10);
        let records = vec![
            record("m1", date(2024, 6, 1), "pending"),
            record("m2", date(2024, 6, 12), "pending"),
            record("m3", date(2024, 6, 20), "pending"),
            record("m4", date(2024, 6, 1), "completed"),
        ];

        let notifications = classify(now, &records, Duration::days(7));

        assert_eq!(notifications.len(), 2);
        assert_eq!(notifications[0].kind, NotificationKind::Overdue);
        assert_eq!(notifications[0].priority, NotificationPriority::High);
        assert!(notifications[0].message.contains("m1"));
        assert_eq!(notifications[0].due_at, date(2024, 6, 1));
        assert_eq!(notifications[1].kind, NotificationKind::Upcoming);
        assert_eq!(notifications[1].priority, NotificationPriority::Medium);
        assert!(notifications[1].message.contains("m2"));
    }

    #[test]
    fn completed_records_never_alert() {
        let now = date(2024, 6, 10);
        let records = vec![
            record("m1", date(2024, 6, 1), "completed"),
            record("m2", date(2024, 6, 12), "completed"),
        ];
        assert!(classify(now, &records, Duration::days(7)).is_empty());
    }

    #[test]
    fn unknown_status_still_alerts() {
        let now = date(2024, 6, 10);
        let records = vec![record("m1", date(2024, 6, 1), "in_progress")];
        let notifications = classify(now, &records, Duration::days(7));
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, NotificationKind::Overdue);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let now = date(2024, 6, 10);
        let records = vec![
            // exactly now: upcoming, not overdue
            record("m1", now, "pending"),
            // exactly now + window: still upcoming
            record("m2", now + Duration::days(7), "pending"),
            // one second past the window: nothing
            record("m3", now + Duration::days(7) + Duration::seconds(1), "pending"),
        ];

        let notifications = classify(now, &records, Duration::days(7));
        assert_eq!(notifications.len(), 2);
        assert!(notifications
            .iter()
            .all(|n| n.kind == NotificationKind::Upcoming));
    }

    #[test]
    fn overdue_precede_upcoming_in_input_order() {
        let now = date(2024, 6, 10);
        // deliberately not date-sorted
        let records = vec![
            record("u1", date(2024, 6, 16), "pending"),
            record("o1", date(2024, 6, 5), "pending"),
            record("u2", date(2024, 6, 11), "pending"),
            record("o2", date(2024, 6, 1), "pending"),
        ];

        let ids: Vec<String> = classify(now, &records, Duration::days(7))
            .into_iter()
            .map(|n| n.message)
            .collect();

        assert!(ids[0].contains("o1"));
        assert!(ids[1].contains("o2"));
        assert!(ids[2].contains("u1"));
        assert!(ids[3].contains("u2"));
    }

    #[test]
    fn reclassification_is_stable_except_ids() {
        let now = date(2024, 6, 10);
        let records = vec![
            record("m1", date(2024, 6, 1), "pending"),
            record("m2", date(2024, 6, 12), "pending"),
        ];

        let a = classify(now, &records, Duration::days(7));
        let b = classify(now, &records, Duration::days(7));

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.kind, y.kind);
            assert_eq!(x.title, y.title);
            assert_eq!(x.message, y.message);
            assert_eq!(x.due_at, y.due_at);
            assert_eq!(x.priority, y.priority);
            assert_ne!(x.id, y.id);
        }
    }

    #[test]
    fn default_window_is_seven_days() {
        let cfg = AlertsConfig::default();
        assert_eq!(lookahead_window(&cfg), Duration::days(7));
    }
}
