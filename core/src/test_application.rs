use crate::application::{ApplicationStatus, TransitionError};
use crate::invariants::assert_valid_status_transition;
use crate::label::SubmissionLabel;

#[test]
fn test_pending_can_be_approved_or_rejected() {
    assert_eq!(
        ApplicationStatus::Pending.transition(ApplicationStatus::Approved),
        Ok(ApplicationStatus::Approved)
    );
    assert_eq!(
        ApplicationStatus::Pending.transition(ApplicationStatus::Rejected),
        Ok(ApplicationStatus::Rejected)
    );
    assert_valid_status_transition(ApplicationStatus::Pending, ApplicationStatus::Approved);
    assert_valid_status_transition(ApplicationStatus::Pending, ApplicationStatus::Rejected);
}

#[test]
fn test_double_approval_rejected() {
    let err = ApplicationStatus::Approved
        .transition(ApplicationStatus::Approved)
        .unwrap_err();
    assert_eq!(err, TransitionError::AlreadyDecided(ApplicationStatus::Approved));
}

#[test]
fn test_no_transition_out_of_terminal_states() {
    for terminal in [ApplicationStatus::Approved, ApplicationStatus::Rejected] {
        for to in [
            ApplicationStatus::Pending,
            ApplicationStatus::Approved,
            ApplicationStatus::Rejected,
        ] {
            assert!(terminal.transition(to).is_err());
        }
    }
}

#[test]
fn test_no_transition_back_to_pending() {
    assert_eq!(
        ApplicationStatus::Pending.transition(ApplicationStatus::Pending),
        Err(TransitionError::BackToPending)
    );
}

#[test]
fn test_status_round_trips_through_strings() {
    for status in [
        ApplicationStatus::Pending,
        ApplicationStatus::Approved,
        ApplicationStatus::Rejected,
    ] {
        assert_eq!(status.as_str().parse(), Ok(status));
    }
    assert!("Withdrawn".parse::<ApplicationStatus>().is_err());
}

#[test]
fn test_label_round_trips_through_strings() {
    for label in [
        SubmissionLabel::Unreviewed,
        SubmissionLabel::Reviewed,
        SubmissionLabel::Shortlisted,
        SubmissionLabel::Spam,
    ] {
        assert_eq!(label.as_str().parse(), Ok(label));
    }
    assert!("Winner".parse::<SubmissionLabel>().is_err());
    assert_eq!(SubmissionLabel::default(), SubmissionLabel::Unreviewed);
}
