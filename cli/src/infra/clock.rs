//! Infrastructure implementation of the `Clock` port.

use chrono::NaiveDateTime;

use crate::application::ports::Clock;

/// Local wall-clock time from the operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
