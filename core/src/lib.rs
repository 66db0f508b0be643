//! # Bountyboard Core
//!
//! Pure domain logic for the bountyboard marketplace, shared by the REST
//! backend.  Everything in this crate is synchronous and I/O-free; the
//! backend owns persistence and external services.
//!
//! | Concern            | Module          |
//! |--------------------|-----------------|
//! | Listing valuation  | [`valuation`]   |
//! | Review lifecycle   | [`application`] |
//! | Payment tranches   | [`ledger`]      |
//! | Review labels      | [`label`]       |
//!
//! ## Lifecycle as a Finite-State Machine
//!
//! [`ApplicationStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Pending ──► Approved
//!     └─────► Rejected
//! ```
//!
//! `Approved` and `Rejected` are terminal; there is no way back to
//! `Pending`, and a decided application cannot be re-decided.

pub mod application;
pub mod label;
pub mod ledger;
pub mod valuation;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_application;
#[cfg(test)]
mod test_ledger;
#[cfg(test)]
mod test_valuation;

pub use application::{ApplicationStatus, ParseStatusError, TransitionError};
pub use label::{ParseLabelError, SubmissionLabel};
pub use ledger::{PaymentLedger, Tranche};
pub use valuation::{
    format_number_with_suffix, reward_range_display, usd_value, Compensation, ValuationError,
};
