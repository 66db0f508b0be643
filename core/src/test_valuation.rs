use crate::valuation::{
    format_number_with_suffix, reward_range_display, usd_value, Compensation, ValuationError,
};

#[test]
fn test_suffix_formatting() {
    assert_eq!(format_number_with_suffix(999.0), "999");
    assert_eq!(format_number_with_suffix(1_000.0), "1K");
    assert_eq!(format_number_with_suffix(1_500.0), "1.5K");
    assert_eq!(format_number_with_suffix(10_000.0), "10K");
    assert_eq!(format_number_with_suffix(2_500_000.0), "2.5M");
    assert_eq!(format_number_with_suffix(100.0), "100");
}

#[test]
fn test_range_display_with_positive_min() {
    assert_eq!(reward_range_display(Some(1_500.0), 5_000.0), "1.5K-5K");
    assert_eq!(reward_range_display(Some(500.0), 1_500.0), "500-1.5K");
}

#[test]
fn test_range_display_falls_back_to_upto() {
    assert_eq!(reward_range_display(None, 5_000.0), "Upto 5K");
    assert_eq!(reward_range_display(Some(0.0), 2_000_000.0), "Upto 2M");
}

#[test]
fn test_fixed_usd_value() {
    let comp = Compensation::from_parts("fixed", Some(1_000.0), None, None).unwrap();
    let amount = comp.publish_amount().unwrap();
    assert_eq!(usd_value(amount, 1.0), 1_000.0);
}

#[test]
fn test_range_usd_value_uses_midpoint() {
    let comp = Compensation::from_parts("range", None, Some(500.0), Some(1_500.0)).unwrap();
    let amount = comp.publish_amount().unwrap();
    assert_eq!(amount, 1_000.0);
    assert_eq!(usd_value(amount, 2.0), 2_000.0);
}

#[test]
fn test_variable_has_no_publish_amount() {
    let comp = Compensation::from_parts("variable", None, None, None).unwrap();
    assert_eq!(comp.publish_amount(), None);
}

#[test]
fn test_inverted_range_rejected() {
    let err = Compensation::from_parts("range", None, Some(2_000.0), Some(1_000.0)).unwrap_err();
    assert_eq!(
        err,
        ValuationError::InvalidRange {
            min: 2_000.0,
            max: 1_000.0
        }
    );
}

#[test]
fn test_missing_amounts_rejected() {
    assert!(Compensation::from_parts("fixed", None, None, None).is_err());
    assert!(Compensation::from_parts("range", None, Some(1.0), None).is_err());
    assert!(matches!(
        Compensation::from_parts("bonus", None, None, None),
        Err(ValuationError::UnknownCompensationType(_))
    ));
}
