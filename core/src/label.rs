//! Review-label taxonomy for submissions and grant applications.
//!
//! Labels are reviewer-facing triage tags.  They are parsed strictly at the
//! request boundary; an unrecognised label is a validation error, not a new
//! free-form value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionLabel {
    #[default]
    Unreviewed,
    Reviewed,
    Shortlisted,
    Spam,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown label: {0}")]
pub struct ParseLabelError(pub String);

impl SubmissionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unreviewed => "Unreviewed",
            Self::Reviewed => "Reviewed",
            Self::Shortlisted => "Shortlisted",
            Self::Spam => "Spam",
        }
    }
}

impl fmt::Display for SubmissionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionLabel {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unreviewed" => Ok(Self::Unreviewed),
            "Reviewed" => Ok(Self::Reviewed),
            "Shortlisted" => Ok(Self::Shortlisted),
            "Spam" => Ok(Self::Spam),
            other => Err(ParseLabelError(other.to_string())),
        }
    }
}
