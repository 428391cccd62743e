// tests/property_cycle.rs

use proptest::prelude::*;

use cyclesched::cycle::{CycleDuration, CycleTime};
use cyclesched::errors::SchedulerError;
use cyclesched::task::RequisiteSet;

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        _ => 28,
    }
}

/// Any valid 14-digit cycle text.
fn valid_full_text() -> impl Strategy<Value = String> {
    (1900u32..2200, 1u32..=12)
        .prop_flat_map(|(y, m)| (Just(y), Just(m), 1..=days_in_month(y, m), 0u32..24, 0u32..60, 0u32..60))
        .prop_map(|(y, m, d, h, mi, s)| format!("{y:04}{m:02}{d:02}{h:02}{mi:02}{s:02}"))
}

fn cycle() -> impl Strategy<Value = CycleTime> {
    valid_full_text().prop_map(|t| CycleTime::parse(&t).unwrap())
}

fn duration() -> impl Strategy<Value = CycleDuration> {
    (
        (-50i64..50, -400i64..400, -1000i64..1000),
        (-5000i64..5000, -100_000i64..100_000),
        (-5000i64..5000, -2_000_000i64..2_000_000),
    )
        .prop_map(
            |((weeks, days, hours), (minutes, seconds), (milliseconds, microseconds))| {
                CycleDuration {
                    weeks,
                    days,
                    hours,
                    minutes,
                    seconds,
                    milliseconds,
                    microseconds,
                }
            },
        )
}

proptest! {
    #[test]
    fn full_text_round_trips(text in valid_full_text()) {
        let c = CycleTime::parse(&text).unwrap();
        prop_assert_eq!(c.to_full_string(), text);
    }

    #[test]
    fn short_forms_round_trip_padded(text in valid_full_text()) {
        let hour_form = &text[..10];
        let minute_form = &text[..12];
        prop_assert_eq!(
            CycleTime::parse(hour_form).unwrap().to_full_string(),
            format!("{hour_form}0000")
        );
        prop_assert_eq!(
            CycleTime::parse(minute_form).unwrap().to_full_string(),
            format!("{minute_form}00")
        );
    }

    #[test]
    fn display_reparses_to_same_instant(c in cycle()) {
        prop_assert_eq!(CycleTime::parse(&c.to_string()).unwrap(), c);
    }

    #[test]
    fn wrong_lengths_are_rejected(digits in "[0-9]{0,20}") {
        prop_assume!(![10, 12, 14].contains(&digits.len()));
        let rejected = matches!(
            CycleTime::parse(&digits),
            Err(SchedulerError::InvalidCycleTime { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn days_past_month_end_are_rejected(y in 1900u32..2200, m in 1u32..=12, extra in 1u32..=5) {
        let day = days_in_month(y, m) + extra;
        prop_assume!(day <= 99);
        let text = format!("{y:04}{m:02}{day:02}00");
        let rejected = matches!(
            CycleTime::parse(&text),
            Err(SchedulerError::InvalidCycleTime { .. })
        );
        prop_assert!(rejected);
    }

    #[test]
    fn decrement_undoes_increment(c in cycle(), d in duration()) {
        let there = c.increment(d).unwrap();
        prop_assert_eq!(there.decrement(d).unwrap(), c);
    }

    #[test]
    fn subtract_is_antisymmetric(a in cycle(), b in cycle()) {
        prop_assert_eq!(a.subtract(&b), -b.subtract(&a));
        prop_assert_eq!(a.subtract_hours(&b), -b.subtract_hours(&a));
    }

    #[test]
    fn all_satisfied_only_after_last_label(
        order in (1usize..12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let labels: Vec<String> = (0..order.len()).map(|i| format!("out{i} for 2011052600")).collect();
        let mut set = RequisiteSet::from_labels(labels.clone());

        for (done, i) in order.iter().enumerate() {
            prop_assert!(!set.all_satisfied());
            prop_assert!(set.satisfy(&labels[*i]));
            prop_assert_eq!(set.satisfied_count(), done + 1);
        }
        prop_assert!(set.all_satisfied());
    }

    #[test]
    fn satisfy_from_only_takes_satisfied_source_labels(
        ours in proptest::collection::vec("[a-d]{1,2}", 0..8),
        theirs in proptest::collection::vec(("[a-d]{1,2}", any::<bool>()), 0..8),
    ) {
        let mut target = RequisiteSet::from_labels(ours.clone());
        let mut source = RequisiteSet::new();
        for (label, sat) in &theirs {
            source.add(label.clone());
            if *sat {
                source.satisfy(label);
            }
        }

        let before = target.clone();
        let would = target.would_satisfy_from([&source]);
        prop_assert_eq!(&target, &before);

        target.satisfy_from(&source);
        for (label, sat) in target.iter() {
            if sat {
                prop_assert!(source.is_satisfied(label));
            }
        }
        prop_assert_eq!(would, target.all_satisfied());
    }
}
