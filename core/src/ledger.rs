//! Append-only payment-tranche ledger for approved grant applications.
//!
//! Each application owns an ordered sequence of tranche records plus two
//! running totals (`total_paid`, `total_tranches`).  Tranche numbers are
//! strictly sequential starting at 1, with no gaps; the next number is
//! always derived from `total_tranches`, the persisted counter, so the
//! caller must read and write the ledger inside one storage transaction.
//!
//! The parent grant keeps its own `total_paid` aggregate — the sum of all
//! of its applications' tranches — which the backend updates in the same
//! transaction as every tranche append.

use serde::{Deserialize, Serialize};

/// One discrete payment installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tranche {
    /// 1-based sequence number within the application.
    pub tranche: u32,
    pub amount: f64,
    /// On-chain transaction reference; empty when not supplied.
    #[serde(default)]
    pub tx_id: String,
    #[serde(default)]
    pub note: String,
}

/// Running payment state of a single grant application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentLedger {
    pub total_paid: f64,
    pub total_tranches: u32,
    pub tranches: Vec<Tranche>,
}

impl PaymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from the persisted columns of an application row.
    pub fn from_parts(total_paid: f64, total_tranches: u32, details_json: Option<&str>) -> Self {
        Self {
            total_paid,
            total_tranches,
            tranches: Self::parse_details(details_json),
        }
    }

    /// Decode the stored tranche sequence.  Anything that is not a JSON
    /// array of tranche records is treated as an empty ledger, so legacy
    /// rows with a null or malformed column do not poison new payments.
    pub fn parse_details(details_json: Option<&str>) -> Vec<Tranche> {
        details_json
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }

    /// Append a tranche numbered `total_tranches + 1` and bump both totals.
    pub fn record(
        &mut self,
        amount: f64,
        tx_id: impl Into<String>,
        note: impl Into<String>,
    ) -> Tranche {
        let tranche = Tranche {
            tranche: self.total_tranches + 1,
            amount,
            tx_id: tx_id.into(),
            note: note.into(),
        };
        self.total_paid += amount;
        self.total_tranches += 1;
        self.tranches.push(tranche.clone());
        tranche
    }

    /// Serialise the tranche sequence for the `payment_details` column.
    pub fn details_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.tranches)
    }
}
