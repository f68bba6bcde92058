//! Secure link entity and its lifecycle state machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a link.
///
/// `Active` is the initial state. `Expired` and `Revoked` are terminal:
/// no transition ever leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    Active,
    Expired,
    Revoked,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(Self::Active),
            "EXPIRED" => Some(Self::Expired),
            "REVOKED" => Some(Self::Revoked),
            _ => None,
        }
    }
}

/// What a short code resolves to.
///
/// A link points at exactly one target, fixed at creation. The tagged
/// representation makes "both set" and "neither set" unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    Redirect {
        url: String,
    },
    File {
        path: String,
        original_filename: String,
    },
}

/// A protected short link.
///
/// `version` is the optimistic-concurrency token: every persisted mutation
/// bumps it, and a write only applies when the caller's copy is current.
#[derive(Debug, Clone)]
pub struct SecureLink {
    pub id: Uuid,
    pub short_code: String,
    pub target: LinkTarget,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i32>,
    pub view_count: i32,
    pub status: LinkStatus,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub version: i64,
}

impl SecureLink {
    pub fn is_active(&self) -> bool {
        self.status == LinkStatus::Active
    }

    pub fn is_revoked(&self) -> bool {
        self.status == LinkStatus::Revoked
    }

    /// Protection is on iff a password hash is stored.
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Returns true if the TTL trigger fired: `expires_at` is set and `now`
    /// is past it. Pure check, no side effect.
    pub fn is_time_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now > e)
    }

    /// Returns true if the view-quota trigger fired.
    pub fn has_reached_view_limit(&self) -> bool {
        self.max_views.is_some_and(|max| self.view_count >= max)
    }

    /// Lazy expiration: transitions to `Expired` when the TTL trigger fired.
    ///
    /// Returns whether a transition happened; the caller persists it. Kept
    /// separate from the pure check so the read-path side effect is
    /// independently testable.
    pub fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_time_expired(now) {
            self.expire();
            true
        } else {
            false
        }
    }

    /// Counts one successful view.
    ///
    /// The quota trigger is deliberately not applied here: a link that just
    /// consumed its last allowed view stays `Active` until the next
    /// resolution read or sweep detects the exhausted quota.
    pub fn record_view(&mut self) {
        self.view_count += 1;
    }

    pub fn expire(&mut self) {
        self.status = LinkStatus::Expired;
    }

    pub fn revoke(&mut self) {
        self.status = LinkStatus::Revoked;
    }
}

/// Input data for persisting a new link.
#[derive(Debug, Clone)]
pub struct NewSecureLink {
    pub short_code: String,
    pub target: LinkTarget,
    pub expires_at: Option<DateTime<Utc>>,
    pub max_views: Option<i32>,
    pub password_hash: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn active_link() -> SecureLink {
        SecureLink {
            id: Uuid::new_v4(),
            short_code: "abc12345".to_string(),
            target: LinkTarget::Redirect {
                url: "https://example.com".to_string(),
            },
            expires_at: None,
            max_views: None,
            view_count: 0,
            status: LinkStatus::Active,
            password_hash: None,
            created_at: Utc::now(),
            version: 0,
        }
    }

    #[test]
    fn test_time_expiry_trigger() {
        let mut link = active_link();
        let now = Utc::now();

        assert!(!link.is_time_expired(now));

        link.expires_at = Some(now - Duration::seconds(1));
        assert!(link.is_time_expired(now));

        link.expires_at = Some(now + Duration::hours(1));
        assert!(!link.is_time_expired(now));
    }

    #[test]
    fn test_expire_if_due_transitions_and_reports() {
        let now = Utc::now();
        let mut link = active_link();
        link.expires_at = Some(now - Duration::minutes(5));

        assert!(link.expire_if_due(now));
        assert_eq!(link.status, LinkStatus::Expired);

        let mut fresh = active_link();
        fresh.expires_at = Some(now + Duration::minutes(5));
        assert!(!fresh.expire_if_due(now));
        assert_eq!(fresh.status, LinkStatus::Active);
    }

    #[test]
    fn test_view_quota_trigger() {
        let mut link = active_link();
        assert!(!link.has_reached_view_limit());

        link.max_views = Some(2);
        link.view_count = 1;
        assert!(!link.has_reached_view_limit());

        link.view_count = 2;
        assert!(link.has_reached_view_limit());
    }

    #[test]
    fn test_record_view_only_increments() {
        let mut link = active_link();
        link.max_views = Some(2);

        link.record_view();
        link.record_view();

        assert_eq!(link.view_count, 2);
        assert_eq!(link.status, LinkStatus::Active);
        assert!(link.has_reached_view_limit());
    }

    #[test]
    fn test_password_protection_follows_hash_presence() {
        let mut link = active_link();
        assert!(!link.is_password_protected());

        link.password_hash = Some("$argon2id$...".to_string());
        assert!(link.is_password_protected());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [LinkStatus::Active, LinkStatus::Expired, LinkStatus::Revoked] {
            assert_eq!(LinkStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LinkStatus::parse("DELETED"), None);
    }
}
