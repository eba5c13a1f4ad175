//! Calendar units and time zones.

use crate::errors::{ExpressionError, Result};
use crate::evaluator::ExpressionEvaluator;
use crate::stdlib::constant_value;
use crate::values::Value;
use chrono_tz::Tz;
use core::fmt;
use core::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DateUnit {
    Nanosecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl DateUnit {
    pub const ALL: [DateUnit; 9] = [
        DateUnit::Nanosecond,
        DateUnit::Millisecond,
        DateUnit::Second,
        DateUnit::Minute,
        DateUnit::Hour,
        DateUnit::Day,
        DateUnit::Week,
        DateUnit::Month,
        DateUnit::Year,
    ];

    /// Value of the matching `DATE_UNIT_*` constant.
    pub fn name(self) -> &'static str {
        match self {
            DateUnit::Nanosecond => "nanosecond",
            DateUnit::Millisecond => "millisecond",
            DateUnit::Second => "second",
            DateUnit::Minute => "minute",
            DateUnit::Hour => "hour",
            DateUnit::Day => "day",
            DateUnit::Week => "week",
            DateUnit::Month => "month",
            DateUnit::Year => "year",
        }
    }

    /// Fixed length in nanoseconds, for units up to a day.
    pub fn nanos(self) -> Option<i128> {
        match self {
            DateUnit::Nanosecond => Some(1),
            DateUnit::Millisecond => Some(1_000_000),
            DateUnit::Second => Some(1_000_000_000),
            DateUnit::Minute => Some(60_000_000_000),
            DateUnit::Hour => Some(3_600_000_000_000),
            DateUnit::Day => Some(86_400_000_000_000),
            DateUnit::Week | DateUnit::Month | DateUnit::Year => None,
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DateUnit {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        DateUnit::ALL
            .into_iter()
            .find(|unit| unit.name() == lowered)
            .ok_or_else(|| format!("unknown date unit '{s}'"))
    }
}

pub fn parse_unit(function: &str, text: &str) -> Result<DateUnit> {
    text.parse()
        .map_err(|message: String| ExpressionError::value_error(function, message))
}

pub fn parse_zone(function: &str, text: &str) -> Result<Tz> {
    text.trim()
        .parse::<Tz>()
        .map_err(|_| ExpressionError::value_error(function, format!("unknown time zone '{text}'")))
}

/// Rejects units without a meaning for times of day.
pub fn time_unit(function: &str, unit: DateUnit, allow_day: bool) -> Result<DateUnit> {
    match unit {
        DateUnit::Day if allow_day => Ok(unit),
        DateUnit::Nanosecond
        | DateUnit::Millisecond
        | DateUnit::Second
        | DateUnit::Minute
        | DateUnit::Hour => Ok(unit),
        _ => Err(ExpressionError::value_error(
            function,
            format!("unit '{unit}' is not supported for times of day"),
        )),
    }
}

/// Validates a constant text argument up front so malformed constants fault
/// at parse time; dynamic arguments are validated per row.
pub fn check_constant<T>(
    arg: Option<&ExpressionEvaluator>,
    parse: impl Fn(&str) -> Result<T>,
) -> Result<()> {
    if let Some(arg) = arg {
        if let Some(value) = constant_value(arg)? {
            if let Some(text) = value.as_str() {
                parse(text)?;
            }
        }
    }
    Ok(())
}

/// Optional zone argument at `index`: absent means `default`, missing
/// means `None`.
pub fn zone_at(function: &str, args: &[Value], index: usize, default: Tz) -> Result<Option<Tz>> {
    match args.get(index) {
        None => Ok(Some(default)),
        Some(value) => value.as_str().map(|text| parse_zone(function, text)).transpose(),
    }
}

/// Optional text argument at `index`; absent and missing both read as `None`.
pub fn text_at(args: &[Value], index: usize) -> Option<&str> {
    args.get(index).and_then(Value::as_str)
}
