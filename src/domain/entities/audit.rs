//! Access audit record: one immutable row per resolution attempt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome taxonomy for a resolution attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessResult {
    Success,
    NotFound,
    Revoked,
    Expired,
    ViewLimitReached,
    PasswordRequired,
    InvalidPassword,
    UnexpectedState,
}

impl AccessResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::NotFound => "NOT_FOUND",
            Self::Revoked => "REVOKED",
            Self::Expired => "EXPIRED",
            Self::ViewLimitReached => "VIEW_LIMIT_REACHED",
            Self::PasswordRequired => "PASSWORD_REQUIRED",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::UnexpectedState => "UNEXPECTED_STATE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(Self::Success),
            "NOT_FOUND" => Some(Self::NotFound),
            "REVOKED" => Some(Self::Revoked),
            "EXPIRED" => Some(Self::Expired),
            "VIEW_LIMIT_REACHED" => Some(Self::ViewLimitReached),
            "PASSWORD_REQUIRED" => Some(Self::PasswordRequired),
            "INVALID_PASSWORD" => Some(Self::InvalidPassword),
            "UNEXPECTED_STATE" => Some(Self::UnexpectedState),
            _ => None,
        }
    }
}

/// Caller context captured at the HTTP boundary and carried into the audit
/// trail.
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A persisted audit row. Never mutated or deleted.
#[derive(Debug, Clone)]
pub struct AccessAuditRecord {
    pub id: Uuid,
    pub short_code: String,
    pub result: AccessResult,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

/// Input for appending one audit row, timestamped at call time.
#[derive(Debug, Clone)]
pub struct NewAuditRecord {
    pub short_code: String,
    pub result: AccessResult,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl NewAuditRecord {
    pub fn new(short_code: &str, result: AccessResult, context: &AccessContext) -> Self {
        Self {
            short_code: short_code.to_string(),
            result,
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
            accessed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_result_roundtrip() {
        let all = [
            AccessResult::Success,
            AccessResult::NotFound,
            AccessResult::Revoked,
            AccessResult::Expired,
            AccessResult::ViewLimitReached,
            AccessResult::PasswordRequired,
            AccessResult::InvalidPassword,
            AccessResult::UnexpectedState,
        ];
        for result in all {
            assert_eq!(AccessResult::parse(result.as_str()), Some(result));
        }
        assert_eq!(AccessResult::parse("TIMEOUT"), None);
    }

    #[test]
    fn test_new_record_carries_caller_context() {
        let context = AccessContext {
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("curl/8.0".to_string()),
        };

        let record = NewAuditRecord::new("zz99", AccessResult::NotFound, &context);

        assert_eq!(record.short_code, "zz99");
        assert_eq!(record.result, AccessResult::NotFound);
        assert_eq!(record.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(record.user_agent.as_deref(), Some("curl/8.0"));
    }
}
