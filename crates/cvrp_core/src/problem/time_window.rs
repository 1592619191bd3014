use serde::{Deserialize, Serialize};

/// Permissible arrival interval at a customer, expressed in solver time units.
///
/// Serialized as a two element array `[start, end]`. The `[0, 0]` pair is the
/// default value of an untouched form and means "no constraint".
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        TimeWindow { start, end }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// False for the `[0, 0]` sentinel.
    pub fn is_set(&self) -> bool {
        !(self.start == 0 && self.end == 0)
    }

    pub fn is_valid(&self) -> bool {
        self.start <= self.end
    }
}

impl From<[i64; 2]> for TimeWindow {
    fn from(value: [i64; 2]) -> Self {
        TimeWindow::new(value[0], value[1])
    }
}

impl From<TimeWindow> for [i64; 2] {
    fn from(value: TimeWindow) -> Self {
        [value.start, value.end]
    }
}
