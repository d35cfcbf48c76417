use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::audience::AudienceSelector;
use crate::error::{GarajError, Result};

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

/// Telegram chat id of a user record. Eligibility is decided by the audience
/// query, never by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(pub i64);

impl Recipient {
    pub fn id(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// DeliveryOutcome
// ---------------------------------------------------------------------------

/// Result of one delivery attempt. Every resolved recipient gets exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    Delivered { recipient: Recipient },
    Failed { recipient: Recipient, reason: String },
}

impl DeliveryOutcome {
    pub fn recipient(&self) -> Recipient {
        match self {
            DeliveryOutcome::Delivered { recipient } | DeliveryOutcome::Failed { recipient, .. } => {
                *recipient
            }
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

// ---------------------------------------------------------------------------
// BroadcastJob
// ---------------------------------------------------------------------------

/// In-memory unit of work for one broadcast. Never persisted: a restart
/// mid-dispatch loses the job.
#[derive(Debug, Clone)]
pub struct BroadcastJob {
    pub id: Uuid,
    pub message: String,
    pub selector: AudienceSelector,
    pub submitted_at: DateTime<Utc>,
}

impl BroadcastJob {
    /// Validate a raw request into a job.
    ///
    /// The selector is parsed first so an unknown tag is always reported as
    /// such, then the message is checked for non-whitespace content. The
    /// message itself is kept verbatim.
    pub fn new(message: impl Into<String>, audience: &str) -> Result<Self> {
        let selector: AudienceSelector = audience.parse()?;
        let message = message.into();
        if message.trim().is_empty() {
            return Err(GarajError::EmptyMessage);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            message,
            selector,
            submitted_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_keeps_message_verbatim() {
        let job = BroadcastJob::new("  hello  ", "all").unwrap();
        assert_eq!(job.message, "  hello  ");
        assert_eq!(job.selector, AudienceSelector::All);
    }

    #[test]
    fn blank_message_is_rejected() {
        let err = BroadcastJob::new(" \n\t", "all").unwrap_err();
        assert!(matches!(err, GarajError::EmptyMessage));
    }

    #[test]
    fn unknown_selector_is_rejected_before_message_check() {
        let err = BroadcastJob::new("", "nonexistent_tag").unwrap_err();
        assert!(matches!(err, GarajError::InvalidAudienceSelector(ref s) if s == "nonexistent_tag"));
    }

    #[test]
    fn jobs_get_distinct_ids() {
        let a = BroadcastJob::new("x", "all").unwrap();
        let b = BroadcastJob::new("x", "all").unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = DeliveryOutcome::Failed {
            recipient: Recipient(7),
            reason: "blocked".into(),
        };
        let yaml = serde_yaml::to_string(&outcome).unwrap();
        assert!(yaml.contains("status: failed"));
        assert!(yaml.contains("recipient: 7"));
    }
}
