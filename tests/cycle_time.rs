// tests/cycle_time.rs

mod common;
use crate::common::ct;

use cyclesched::cycle::{CycleDuration, CycleTime};
use cyclesched::errors::SchedulerError;

#[test]
fn parses_full_cycle_into_fields() {
    let c = ct("20110526184359");

    assert_eq!(c.year(), 2011);
    assert_eq!(c.month(), 5);
    assert_eq!(c.day(), 26);
    assert_eq!(c.hour(), 18);
    assert_eq!(c.minute(), 43);
    assert_eq!(c.second(), 59);
    assert_eq!(c.formatted(), "2011/05/26 18:43:59");
    assert_eq!(c.to_full_string(), "20110526184359");
    assert_eq!(c.to_hour_string(), "2011052618");
    assert_eq!(c.datetime().format("%Y-%m-%dT%H:%M:%S").to_string(), "2011-05-26T18:43:59");
}

#[test]
fn short_forms_are_zero_padded() {
    assert_eq!(ct("2011052618").to_full_string(), "20110526180000");
    assert_eq!(ct("201105261843").to_full_string(), "20110526184300");
}

#[test]
fn display_uses_shortest_canonical_form() {
    assert_eq!(ct("20110526180000").to_string(), "2011052618");
    assert_eq!(ct("20110526184300").to_string(), "201105261843");
    assert_eq!(ct("20110526184359").to_string(), "20110526184359");
}

#[test]
fn day_out_of_range_for_month_is_rejected() {
    match CycleTime::parse("2011053918") {
        Err(SchedulerError::InvalidCycleTime { value, .. }) => {
            assert_eq!(value, "2011/05/39 18:00:00");
        }
        other => panic!("expected InvalidCycleTime, got {other:?}"),
    }
}

#[test]
fn bad_lengths_and_characters_are_rejected() {
    for text in ["", "201105", "20110526", "20110526184", "2011052618435", "201105261843599"] {
        assert!(
            matches!(CycleTime::parse(text), Err(SchedulerError::InvalidCycleTime { .. })),
            "{text:?} should be rejected"
        );
    }
    assert!(matches!(
        CycleTime::parse("2011O52618"),
        Err(SchedulerError::InvalidCycleTime { .. })
    ));
}

#[test]
fn calendar_invalid_fields_are_rejected() {
    for text in [
        "2011002618",     // month 0
        "2011132618",     // month 13
        "2011052624",     // hour 24
        "201105261860",   // minute 60
        "20110526184360", // second 60
        "2011022918",     // not a leap year
        "0000010100",     // year 0
    ] {
        assert!(
            matches!(CycleTime::parse(text), Err(SchedulerError::InvalidCycleTime { .. })),
            "{text:?} should be rejected"
        );
    }
    assert!(CycleTime::parse("2012022918").is_ok());
}

#[test]
fn increment_crosses_day_month_and_year() {
    let c = ct("2011123118");
    assert_eq!(c.increment(CycleDuration::hours(6)).unwrap(), ct("2012010100"));
    assert_eq!(c.increment(CycleDuration::days(1)).unwrap(), ct("2012010118"));
    assert_eq!(c.increment(CycleDuration::weeks(1)).unwrap(), ct("2012010718"));
    assert_eq!(
        c.increment(CycleDuration::minutes(90).with_seconds(30)).unwrap(),
        ct("20111231193030")
    );
}

#[test]
fn decrement_crosses_leap_day() {
    let c = ct("2012030100");
    assert_eq!(c.decrement(CycleDuration::hours(1)).unwrap(), ct("2012022923"));
    assert_eq!(c.offset_hours(-24).unwrap(), ct("2012022900"));
    assert_eq!(
        c.decrement(CycleDuration::hours(1).with_minutes(30)).unwrap(),
        ct("201202292230")
    );
}

#[test]
fn sub_second_components_are_truncated() {
    let c = ct("20110526184359");
    let shifted = c
        .increment(CycleDuration::seconds(1).with_milliseconds(999).with_microseconds(999))
        .unwrap();
    assert_eq!(shifted, ct("20110526184400"));
}

#[test]
fn half_second_steps_cancel_out() {
    let c = ct("2011052600");
    let half = CycleDuration::default().with_milliseconds(500);

    assert_eq!(c.increment(half).unwrap().decrement(half).unwrap(), c);
    assert_eq!(c.decrement(half).unwrap(), c);

    let back = CycleDuration::seconds(-1).with_milliseconds(-500);
    assert_eq!(c.increment(back).unwrap(), ct("20110525235959"));
    assert_eq!(c.increment(back).unwrap().decrement(back).unwrap(), c);
}

#[test]
fn subtract_gives_signed_delta_and_whole_hours() {
    let a = ct("2011052618");
    let b = ct("20110526003030");

    assert_eq!(a.subtract(&b).num_seconds(), 17 * 3600 + 29 * 60 + 30);
    assert_eq!(a.subtract_hours(&b), 17);
    assert_eq!(b.subtract_hours(&a), -17);
    assert_eq!(a.subtract(&a).num_seconds(), 0);
}

#[test]
fn ordering_follows_the_calendar() {
    assert!(ct("2011052618") < ct("201105261801"));
    assert!(ct("2011123123") < ct("2012010100"));
}

#[test]
fn deserializes_from_toml_string() {
    #[derive(serde::Deserialize)]
    struct Holder {
        at: CycleTime,
    }

    let ok: Holder = toml::from_str(r#"at = "2011052606""#).unwrap();
    assert_eq!(ok.at, ct("2011052606"));

    let bad = toml::from_str::<Holder>(r#"at = "2011053906""#);
    assert!(bad.is_err());
}
