#![allow(dead_code)]

pub use cyclesched_test_utils::builders;
pub use cyclesched_test_utils::fake_launcher;
pub use cyclesched_test_utils::{init_tracing, with_timeout};

use cyclesched::cycle::CycleTime;
use cyclesched::task::TaskId;

pub fn ct(text: &str) -> CycleTime {
    CycleTime::parse(text).expect("test cycle time must be valid")
}

pub fn tid(kind: &str, cycle: &str) -> TaskId {
    TaskId::new(kind, ct(cycle))
}
