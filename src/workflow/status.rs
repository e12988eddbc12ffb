use std::fmt;

use serde::{Deserialize, Serialize};

/// The external-facing lifecycle values of a job application.
///
/// Signals may move an application between the non-archived values freely;
/// `Archived` is terminal and is normally reached through the auto-archive
/// timer or the reconciliation scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Applied,
    Pending,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
    Archived,
}

impl ApplicationStatus {
    /// `Archived` admits no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Archived)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApplicationStatus::Applied => write!(f, "applied"),
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Interview => write!(f, "interview"),
            ApplicationStatus::Offer => write!(f, "offer"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
            ApplicationStatus::Withdrawn => write!(f, "withdrawn"),
            ApplicationStatus::Archived => write!(f, "archived"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        assert_eq!(ApplicationStatus::Applied.to_string(), "applied");
        assert_eq!(ApplicationStatus::Pending.to_string(), "pending");
        assert_eq!(ApplicationStatus::Interview.to_string(), "interview");
        assert_eq!(ApplicationStatus::Offer.to_string(), "offer");
        assert_eq!(ApplicationStatus::Rejected.to_string(), "rejected");
        assert_eq!(ApplicationStatus::Withdrawn.to_string(), "withdrawn");
        assert_eq!(ApplicationStatus::Archived.to_string(), "archived");
    }

    #[test]
    fn only_archived_is_terminal() {
        assert!(ApplicationStatus::Archived.is_terminal());
        assert!(!ApplicationStatus::Applied.is_terminal());
        assert!(!ApplicationStatus::Offer.is_terminal());
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&ApplicationStatus::Interview).unwrap();
        assert_eq!(json, r#""interview""#);
        let parsed: ApplicationStatus = serde_json::from_str(r#""archived""#).unwrap();
        assert_eq!(parsed, ApplicationStatus::Archived);
    }
}
