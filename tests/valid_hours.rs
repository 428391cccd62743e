// tests/valid_hours.rs

mod common;

use common::ct;
use cyclesched::cycle::ValidHours;
use cyclesched::errors::SchedulerError;

fn synoptic() -> ValidHours {
    ValidHours::new([18, 0, 12, 6]).unwrap()
}

#[test]
fn hours_are_kept_sorted() {
    assert_eq!(synoptic().hours(), &[0, 6, 12, 18]);
    assert!(synoptic().contains(12));
    assert!(!synoptic().contains(3));
}

#[test]
fn nearest_keeps_a_valid_cycle() {
    assert_eq!(synoptic().nearest(ct("2011052612")).unwrap(), ct("2011052612"));
}

#[test]
fn nearest_rounds_up_to_next_valid_hour() {
    assert_eq!(synoptic().nearest(ct("2011052613")).unwrap(), ct("2011052618"));
    assert_eq!(synoptic().nearest(ct("2011052619")).unwrap(), ct("2011052700"));
}

#[test]
fn nearest_across_month_end() {
    assert_eq!(synoptic().nearest(ct("2011053121")).unwrap(), ct("2011060100"));
}

#[test]
fn next_steps_to_following_valid_hour() {
    assert_eq!(synoptic().next(ct("2011052600")).unwrap(), ct("2011052606"));
    assert_eq!(synoptic().next(ct("2011052618")).unwrap(), ct("2011052700"));
}

#[test]
fn next_from_invalid_hour_is_strictly_later() {
    assert_eq!(synoptic().next(ct("2011052607")).unwrap(), ct("2011052612"));
    assert_eq!(synoptic().next(ct("2011052623")).unwrap(), ct("2011052700"));
}

#[test]
fn single_hour_wraps_a_whole_day() {
    let daily = ValidHours::new([6]).unwrap();
    assert_eq!(daily.next(ct("2011052606")).unwrap(), ct("2011052706"));
    assert_eq!(daily.nearest(ct("2011052607")).unwrap(), ct("2011052706"));
}

#[test]
fn next_across_year_end() {
    let twice = ValidHours::new([0, 12]).unwrap();
    assert_eq!(twice.next(ct("2011123112")).unwrap(), ct("2012010100"));
}

#[test]
fn rejects_empty_out_of_range_and_duplicates() {
    for bad in [vec![], vec![24], vec![0, 6, 6]] {
        let err = ValidHours::new(bad.clone()).unwrap_err();
        assert!(
            matches!(err, SchedulerError::ConfigError(_)),
            "{bad:?} gave {err:?}"
        );
    }
}
