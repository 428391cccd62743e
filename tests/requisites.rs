// tests/requisites.rs

use cyclesched::task::RequisiteSet;

#[test]
fn empty_set_is_vacuously_satisfied() {
    let set = RequisiteSet::new();
    assert!(set.is_empty());
    assert!(set.all_satisfied());
    assert_eq!(set.satisfied_count(), 0);
}

#[test]
fn from_labels_collapses_duplicates() {
    let set = RequisiteSet::from_labels(["a for 2011052600", "b for 2011052600", "a for 2011052600"]);
    assert_eq!(set.len(), 2);
    assert!(!set.all_satisfied());
    let labels: Vec<&str> = set.iter().map(|(l, _)| l).collect();
    assert_eq!(labels, vec!["a for 2011052600", "b for 2011052600"]);
}

#[test]
fn satisfy_reports_only_real_changes() {
    let mut set = RequisiteSet::from_labels(["x"]);
    assert!(set.satisfy("x"));
    assert!(!set.satisfy("x"), "second satisfy is a no-op");
    assert!(!set.satisfy("unknown"), "unknown labels are ignored");
    assert!(!set.exists("unknown"));
    assert!(set.is_satisfied("x"));
    assert!(!set.is_satisfied("unknown"));
}

#[test]
fn satisfy_from_counts_newly_satisfied_labels() {
    let mut ours = RequisiteSet::from_labels(["a", "b", "c"]);
    ours.satisfy("c");

    let mut theirs = RequisiteSet::from_labels(["a", "b", "c", "d"]);
    theirs.satisfy("a");
    theirs.satisfy("c");
    theirs.satisfy("d");

    assert_eq!(ours.satisfy_from(&theirs), 1);
    assert!(ours.is_satisfied("a"));
    assert!(!ours.is_satisfied("b"), "unsatisfied in the source stays unsatisfied");
    assert!(!ours.exists("d"), "labels are never added");
    assert_eq!(ours.satisfy_from(&theirs), 0);
}

#[test]
fn would_satisfy_from_is_read_only() {
    let ours = RequisiteSet::from_labels(["a", "b"]);
    let mut first = RequisiteSet::from_labels(["a"]);
    first.satisfy("a");
    let mut second = RequisiteSet::from_labels(["b"]);
    second.satisfy("b");

    assert!(!ours.would_satisfy_from([&first]));
    assert!(ours.would_satisfy_from([&first, &second]));
    assert_eq!(ours.satisfied_count(), 0);
}

#[test]
fn set_all_satisfied_marks_everything() {
    let mut set = RequisiteSet::from_labels(["a", "b"]);
    set.set_all_satisfied();
    assert!(set.all_satisfied());
    let satisfied: Vec<&str> = set.satisfied_labels().collect();
    assert_eq!(satisfied, vec!["a", "b"]);
}
