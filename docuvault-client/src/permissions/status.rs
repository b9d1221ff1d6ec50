use crate::models::PermissionGrant;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How close to expiry a grant may be before it is flagged to admins.
///
/// Single source of truth: badge rendering and dashboard counters both
/// derive from this constant.
pub const EXPIRING_SOON_WINDOW_DAYS: i64 = 7;

/// Derived lifecycle state of a grant.
///
/// Never persisted; recompute on every read, since a grant that was
/// active an hour ago may now be expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    Active,
    ExpiringSoon,
    Expired,
}

/// Classify a window end against `now`.
///
/// `expired` wins at the boundary: a grant ending exactly now is expired.
pub fn status_at(end_time: DateTime<Utc>, now: DateTime<Utc>) -> PermissionStatus {
    if end_time <= now {
        PermissionStatus::Expired
    } else if end_time - now <= Duration::days(EXPIRING_SOON_WINDOW_DAYS) {
        PermissionStatus::ExpiringSoon
    } else {
        PermissionStatus::Active
    }
}

impl PermissionGrant {
    pub fn status_at(&self, now: DateTime<Utc>) -> PermissionStatus {
        status_at(self.end_time, now)
    }
}

/// Dashboard counters over a permission collection.
///
/// Expiring-soon grants are still active, so they count in both buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionStats {
    pub total: usize,
    pub active: usize,
    pub expiring_soon: usize,
    pub expired: usize,
}

impl PermissionStats {
    pub fn compute(grants: &[PermissionGrant], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total: grants.len(),
            ..Self::default()
        };
        for grant in grants {
            match grant.status_at(now) {
                PermissionStatus::Active => stats.active += 1,
                PermissionStatus::ExpiringSoon => {
                    stats.active += 1;
                    stats.expiring_soon += 1;
                }
                PermissionStatus::Expired => stats.expired += 1,
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentRef, Grantee, GranteeUser};
    use chrono::TimeZone;

    fn at(spec: &str) -> DateTime<Utc> {
        spec.parse().unwrap()
    }

    fn grant(end_time: DateTime<Utc>) -> PermissionGrant {
        PermissionGrant {
            id: "p1".into(),
            document: DocumentRef {
                id: "d1".into(),
                title: "Annual report".into(),
                owner: None,
            },
            grantee: Grantee::User {
                user: GranteeUser {
                    id: None,
                    name: "Marie Martin".into(),
                    email: "marie.martin@example.com".into(),
                },
            },
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            end_time,
            created_at: None,
        }
    }

    #[test]
    fn test_status_worked_examples() {
        let now = at("2024-06-01T00:00:00Z");
        assert_eq!(
            status_at(at("2024-06-05T00:00:00Z"), now),
            PermissionStatus::ExpiringSoon
        );
        assert_eq!(
            status_at(at("2024-07-01T00:00:00Z"), now),
            PermissionStatus::Active
        );
        assert_eq!(
            status_at(at("2024-05-01T00:00:00Z"), now),
            PermissionStatus::Expired
        );
    }

    #[test]
    fn test_end_time_exactly_now_is_expired() {
        let now = at("2024-06-01T00:00:00Z");
        assert_eq!(status_at(now, now), PermissionStatus::Expired);
    }

    #[test]
    fn test_exactly_seven_days_out_is_expiring_soon() {
        let now = at("2024-06-01T00:00:00Z");
        assert_eq!(
            status_at(at("2024-06-08T00:00:00Z"), now),
            PermissionStatus::ExpiringSoon
        );
        // One second past the horizon is plain active.
        assert_eq!(
            status_at(at("2024-06-08T00:00:01Z"), now),
            PermissionStatus::Active
        );
    }

    #[test]
    fn test_stats_count_expiring_soon_as_active() {
        let now = at("2024-06-01T00:00:00Z");
        let grants = vec![
            grant(at("2024-07-01T00:00:00Z")),
            grant(at("2024-06-05T00:00:00Z")),
            grant(at("2024-05-01T00:00:00Z")),
        ];
        let stats = PermissionStats::compute(&grants, now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.expiring_soon, 1);
        assert_eq!(stats.expired, 1);
    }
}
