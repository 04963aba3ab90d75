use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Microseconds since the Unix epoch, the unit of every validity interval.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ValidTime(pub i64);

static LAST_MICROS: Lazy<Mutex<i64>> = Lazy::new(|| Mutex::new(0));

impl ValidTime {
    pub fn now_micros() -> Self {
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as i64;
        Self(micros)
    }

    /// Strictly increasing across the process: two batches stamped in the same
    /// microsecond still form an ordered version chain.
    pub fn now_monotonic() -> Self {
        let physical = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_micros() as i64;
        let mut guard = LAST_MICROS.lock().expect("clock mutex poisoned");
        let next = if physical > *guard { physical } else { *guard + 1 };
        *guard = next;
        Self(next)
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }

    pub fn from_i64(value: i64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::ValidTime;

    #[test]
    fn monotonic_now_never_repeats() {
        let a = ValidTime::now_monotonic();
        let b = ValidTime::now_monotonic();
        let c = ValidTime::now_monotonic();
        assert!(a < b);
        assert!(b < c);
    }
}
