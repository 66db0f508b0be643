//! Grant-application review lifecycle.
//!
//! `Pending` is the only initial state.  `Approved` and `Rejected` are
//! terminal: once a reviewer has decided an application, no further
//! transition is accepted — re-approval and un-rejection are rejected with
//! a [`TransitionError`] rather than silently re-applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Review state of a grant application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationStatus {
    /// Awaiting a reviewer decision.
    Pending,
    /// Accepted; `approved_amount` is set alongside this transition.
    Approved,
    /// Declined.
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("application has already been {0}")]
    AlreadyDecided(ApplicationStatus),

    #[error("an application cannot move back to Pending")]
    BackToPending,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown application status: {0}")]
pub struct ParseStatusError(pub String);

impl ApplicationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// Wire/storage identifier, matching the `applicationStatus` values the
    /// dashboard sends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Validate a reviewer decision against the current state.
    ///
    /// Only `Pending → Approved` and `Pending → Rejected` are accepted.
    pub fn transition(self, to: ApplicationStatus) -> Result<ApplicationStatus, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::AlreadyDecided(self));
        }
        if to == Self::Pending {
            return Err(TransitionError::BackToPending);
        }
        Ok(to)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}
