// tests/templates_and_messages.rs

mod common;

use common::ct;
use cyclesched::errors::SchedulerError;
use cyclesched::exec::parse_message_line;
use cyclesched::task::message::incoming_log_text;
use cyclesched::task::{
    classify, CatchUpSignal, MessageKind, RequisiteSet, RequisiteTemplate, Sentinels,
};
use cyclesched::types::Priority;

#[test]
fn renders_task_name_and_cycle() {
    let t = RequisiteTemplate::parse("$(TASK_NAME) finished for $(CYCLE_TIME)").unwrap();
    let r = t.render("model", ct("2011052606")).unwrap();
    assert_eq!(r.label, "model finished for 2011052606");
    assert_eq!(r.target_cycle, Some(ct("2011052606")));
}

#[test]
fn renders_offsets_across_midnight() {
    let t = RequisiteTemplate::parse("model restart ready for $(CYCLE_TIME-6)").unwrap();
    assert_eq!(t.offsets(), &[-6]);
    assert!(t.has_offset());

    let r = t.render("model", ct("2011052600")).unwrap();
    assert_eq!(r.label, "model restart ready for 2011052518");
    assert_eq!(r.target_cycle, Some(ct("2011052518")));

    let ahead = RequisiteTemplate::parse("x for $(CYCLE_TIME + 12)").unwrap();
    let r = ahead.render("k", ct("2011052618")).unwrap();
    assert_eq!(r.label, "x for 2011052706");
}

#[test]
fn target_cycle_is_the_earliest_mentioned() {
    let t = RequisiteTemplate::parse("span $(CYCLE_TIME-6) to $(CYCLE_TIME)").unwrap();
    let r = t.render("k", ct("2011052612")).unwrap();
    assert_eq!(r.label, "span 2011052606 to 2011052612");
    assert_eq!(r.target_cycle, Some(ct("2011052606")));
}

#[test]
fn label_without_cycle_has_no_target() {
    let t = RequisiteTemplate::parse("$(TASK_NAME) config ok").unwrap();
    let r = t.render("obs", ct("2011052600")).unwrap();
    assert_eq!(r.label, "obs config ok");
    assert_eq!(r.target_cycle, None);
}

#[test]
fn normalized_ignores_offsets_and_resolves_name() {
    let t = RequisiteTemplate::parse("$(TASK_NAME) restart for $(CYCLE_TIME-6)").unwrap();
    assert_eq!(
        t.normalized("model"),
        ("model restart for $(CYCLE_TIME)".to_string(), -6)
    );
}

#[test]
fn unknown_placeholders_are_config_errors() {
    for raw in ["$(OWNER) done for $(CYCLE_TIME)", "x for $(CYCLE_TIME*2)", "   "] {
        let err = RequisiteTemplate::parse(raw).unwrap_err();
        assert!(matches!(err, SchedulerError::ConfigError(_)), "{raw:?}: {err:?}");
    }
}

fn outputs(labels: &[&str]) -> RequisiteSet {
    RequisiteSet::from_labels(labels.iter().copied())
}

#[test]
fn postrequisite_wins_over_sentinels() {
    let sentinels = Sentinels::new("model", ct("2011052600"));
    assert_eq!(sentinels.failed, "model failed for 2011052600");
    assert_eq!(sentinels.ready_to_abdicate, "model ready to abdicate for 2011052600");

    // A kind may declare its abdication notice as an output too.
    let posts = outputs(&["model ready to abdicate for 2011052600"]);
    let m = classify("model ready to abdicate for 2011052600", &posts, &sentinels, false);
    assert_eq!(m.kind, MessageKind::Postrequisite { already_satisfied: false });
    assert!(m.abdication_notice);
}

#[test]
fn repeated_output_is_flagged() {
    let sentinels = Sentinels::new("model", ct("2011052600"));
    let mut posts = outputs(&["model finished for 2011052600"]);
    posts.satisfy("model finished for 2011052600");
    let m = classify("model finished for 2011052600", &posts, &sentinels, false);
    assert_eq!(m.kind, MessageKind::Postrequisite { already_satisfied: true });
    assert!(!m.abdication_notice);
}

#[test]
fn failure_sentinel_is_recognised() {
    let sentinels = Sentinels::new("model", ct("2011052600"));
    let m = classify("model failed for 2011052600", &outputs(&[]), &sentinels, false);
    assert_eq!(m.kind, MessageKind::Failure);

    let other_cycle = classify("model failed for 2011052606", &outputs(&[]), &sentinels, false);
    assert_eq!(other_cycle.kind, MessageKind::Progress);
}

#[test]
fn catch_up_only_for_contact_kinds() {
    let sentinels = Sentinels::new("obs", ct("2011052600"));
    let posts = outputs(&[]);

    let contact = classify("CAUGHTUP: obs now real time", &posts, &sentinels, true);
    assert_eq!(contact.kind, MessageKind::CatchUp(CatchUpSignal::CaughtUp));

    let contact = classify("CATCHINGUP: 3 cycles behind", &posts, &sentinels, true);
    assert_eq!(contact.kind, MessageKind::CatchUp(CatchUpSignal::CatchingUp));

    let plain = classify("CAUGHTUP: obs now real time", &posts, &sentinels, false);
    assert_eq!(plain.kind, MessageKind::Progress);
}

#[test]
fn incoming_log_text_always_names_the_cycle() {
    let c = ct("2011052600");
    assert_eq!(
        incoming_log_text("model finished for 2011052600", c),
        "(INCOMING) model finished for 2011052600"
    );
    assert_eq!(
        incoming_log_text("reading input files", c),
        "(INCOMING) reading input files; for 2011052600"
    );
}

#[test]
fn parses_protocol_lines() {
    assert_eq!(
        parse_message_line("NORMAL: model started for 2011052600  "),
        Some((Priority::Normal, "model started for 2011052600".to_string()))
    );
    assert_eq!(
        parse_message_line("WARNING:disk nearly full"),
        Some((Priority::Warning, "disk nearly full".to_string()))
    );
    assert_eq!(
        parse_message_line("CRITICAL: model failed for 2011052600"),
        Some((Priority::Critical, "model failed for 2011052600".to_string()))
    );
}

#[test]
fn ignores_non_protocol_lines() {
    assert_eq!(parse_message_line("plain job output"), None);
    assert_eq!(parse_message_line("normal: lower case is not a priority"), None);
    assert_eq!(parse_message_line("NORMAL:   "), None);
    assert_eq!(parse_message_line(" NORMAL: leading space"), None);
}
