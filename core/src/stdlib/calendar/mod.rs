//! Calendar Package
//!
//! Instants (`date_*`) and times of day (`time_*`). Units are given as text,
//! normally through the `DATE_UNIT_*` constants; zones are tz database names
//! such as `Europe/Berlin` or `CET`.

mod format;
mod instant;
mod time;
mod units;

use super::NativeFunction;

pub use format::{parse_instant_default, parse_local_time_default};
pub use units::DateUnit;

const GROUP: &str = "calendar";

pub fn functions() -> Vec<NativeFunction> {
    let mut functions = instant::functions();
    functions.extend(time::functions());
    functions
}
