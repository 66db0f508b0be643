#![allow(dead_code)]

use crate::application::ApplicationStatus;
use crate::ledger::PaymentLedger;

/// INV-1: Tranche numbers are strictly sequential starting at 1, no gaps.
pub fn assert_sequential_tranches(ledger: &PaymentLedger) {
    for (i, tranche) in ledger.tranches.iter().enumerate() {
        assert_eq!(
            tranche.tranche,
            (i + 1) as u32,
            "INV-1 violated: expected tranche number {}, got {}",
            i + 1,
            tranche.tranche
        );
    }
}

/// INV-2: `total_paid` equals the sum of all tranche amounts, and
/// `total_tranches` equals the tranche count.
pub fn assert_ledger_totals(ledger: &PaymentLedger) {
    let sum: f64 = ledger.tranches.iter().map(|t| t.amount).sum();
    assert_eq!(
        ledger.total_paid, sum,
        "INV-2 violated: total_paid {} != tranche sum {}",
        ledger.total_paid, sum
    );
    assert_eq!(
        ledger.total_tranches as usize,
        ledger.tranches.len(),
        "INV-2 violated: total_tranches {} != tranche count {}",
        ledger.total_tranches,
        ledger.tranches.len()
    );
}

/// INV-3: A grant's aggregate equals the sum of its applications' totals.
pub fn assert_grant_aggregate(grant_total_paid: f64, ledgers: &[&PaymentLedger]) {
    let sum: f64 = ledgers.iter().map(|l| l.total_paid).sum();
    assert_eq!(
        grant_total_paid, sum,
        "INV-3 violated: grant total_paid {} != application sum {}",
        grant_total_paid, sum
    );
}

/// INV-4: Status transition validity.  Only forward transitions are allowed:
///   Pending  -> Approved | Rejected
///   Approved -> (none)
///   Rejected -> (none)
pub fn assert_valid_status_transition(from: ApplicationStatus, to: ApplicationStatus) {
    let valid = matches!(
        (from, to),
        (ApplicationStatus::Pending, ApplicationStatus::Approved)
            | (ApplicationStatus::Pending, ApplicationStatus::Rejected)
    );

    assert!(
        valid,
        "INV-4 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}
