use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical application statuses.
///
/// Historical data carries free-form strings (`"Pending"`, `"Interview
/// Scheduled"`, `"Offer Accepted"`, ...); parsing folds those legacy variants
/// into this closed set and rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ApplicationStatus {
    Applied,
    Screening,
    Interview,
    TechnicalTest,
    Offer,
    Rejected,
    Withdrawn,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 7] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Screening,
        ApplicationStatus::Interview,
        ApplicationStatus::TechnicalTest,
        ApplicationStatus::Offer,
        ApplicationStatus::Rejected,
        ApplicationStatus::Withdrawn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "Applied",
            ApplicationStatus::Screening => "Screening",
            ApplicationStatus::Interview => "Interview",
            ApplicationStatus::TechnicalTest => "TechnicalTest",
            ApplicationStatus::Offer => "Offer",
            ApplicationStatus::Rejected => "Rejected",
            ApplicationStatus::Withdrawn => "Withdrawn",
        }
    }

    /// Terminal statuses close the loop: no follow-up is expected.
    pub const fn is_terminal(self) -> bool {
        matches!(self, ApplicationStatus::Rejected | ApplicationStatus::Withdrawn)
    }
}

/// Raised when a status string is outside the canonical set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown application status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // Case-insensitive, whitespace-collapsed match over canonical labels
        // and the legacy variants observed in historical exports.
        let folded = value
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_ascii_lowercase();

        let status = match folded.as_str() {
            "applied" | "pending" => ApplicationStatus::Applied,
            "screening" => ApplicationStatus::Screening,
            "interview" | "interviewing" | "interview scheduled" | "interview completed" => {
                ApplicationStatus::Interview
            }
            "technicaltest" | "technical test" => ApplicationStatus::TechnicalTest,
            "offer" | "offered" | "offer received" | "offer accepted" => ApplicationStatus::Offer,
            "rejected" => ApplicationStatus::Rejected,
            "withdrawn" => ApplicationStatus::Withdrawn,
            _ => return Err(UnknownStatus(value.to_string())),
        };
        Ok(status)
    }
}

/// Raised when a transition policy vetoes a status change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("transition {from:?} -> {to:?} denied: {reason}")]
pub struct TransitionDenied {
    pub from: ApplicationStatus,
    pub to: ApplicationStatus,
    pub reason: String,
}

/// Pluggable validation hook for status transitions.
///
/// The default policy is fully permissive, matching the historical behavior
/// where any status may follow any other. Stricter lifecycles can be layered
/// on without touching the service.
pub trait TransitionPolicy: Send + Sync {
    fn check(&self, from: ApplicationStatus, to: ApplicationStatus) -> Result<(), TransitionDenied>;
}

/// Permissive default: every transition is allowed.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyTransition;

impl TransitionPolicy for AnyTransition {
    fn check(
        &self,
        _from: ApplicationStatus,
        _to: ApplicationStatus,
    ) -> Result<(), TransitionDenied> {
        Ok(())
    }
}

/// Stricter policy: terminal statuses are final.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoReopenPolicy;

impl TransitionPolicy for NoReopenPolicy {
    fn check(&self, from: ApplicationStatus, to: ApplicationStatus) -> Result<(), TransitionDenied> {
        if from.is_terminal() && from != to {
            return Err(TransitionDenied {
                from,
                to,
                reason: "application is closed".to_string(),
            });
        }
        Ok(())
    }
}
