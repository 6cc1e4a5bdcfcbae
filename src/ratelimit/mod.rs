//! Fixed-window admission logic and state management.

mod backend;
mod clock;
mod counter;
mod limiter;
mod unit;

pub use backend::AdmissionControl;
pub use clock::{Clock, ManualClock, SystemClock};
pub use limiter::Limiter;
pub use unit::IntervalUnit;
