//! Standard named constants.
//!
//! Alongside the usual booleans and numbers this registers one constant per
//! calendar unit (`DATE_UNIT_*`) and per convertible type (`TYPE_*`), whose
//! values are the lowercase names the functions expect.

use super::calendar::DateUnit;
use crate::api::Constant;
use crate::casting::CAST_TARGETS;
use crate::types::ExpressionType;
use crate::values::Value;

pub fn standard_constants() -> Vec<Constant> {
    let mut constants = vec![
        Constant::new("true", Value::Boolean(Some(true))),
        Constant::new("false", Value::Boolean(Some(false))),
        Constant::new("TRUE", Value::Boolean(Some(true))).invisible(),
        Constant::new("FALSE", Value::Boolean(Some(false))).invisible(),
        Constant::new("E", Value::Double(core::f64::consts::E)).with_doc("Euler's number"),
        Constant::new("PI", Value::Double(core::f64::consts::PI)).with_doc("The ratio of a circle's circumference to its diameter"),
        Constant::new("INFINITY", Value::Double(f64::INFINITY)),
        Constant::new("NaN", Value::Double(f64::NAN)).with_doc("Not a number; the missing numeric value"),
        Constant::new("NAN", Value::Double(f64::NAN)).invisible(),
        Constant::new("MISSING_NUMERIC", Value::missing(ExpressionType::Double)),
        Constant::new("MISSING_NOMINAL", Value::missing(ExpressionType::String)),
        Constant::new("MISSING_DATE", Value::missing(ExpressionType::Instant)),
        Constant::new("MISSING_TIME", Value::missing(ExpressionType::LocalTime)),
    ];
    constants.extend(DateUnit::ALL.into_iter().map(|unit| {
        Constant::new(
            format!("DATE_UNIT_{}", unit.name().to_ascii_uppercase()),
            Value::string(unit.name()),
        )
    }));
    constants.extend(CAST_TARGETS.into_iter().map(|ty| {
        Constant::new(
            format!("TYPE_{}", ty.name().to_ascii_uppercase()),
            Value::string(ty.name()),
        )
    }));
    constants
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(name: &str) -> Constant {
        standard_constants()
            .into_iter()
            .find(|c| c.name == name)
            .unwrap_or_else(|| panic!("{name} is not registered"))
    }

    #[test]
    fn test_unit_and_type_constants() {
        assert_eq!(find("DATE_UNIT_NANOSECOND").value, Value::string("nanosecond"));
        assert_eq!(find("TYPE_LOCAL_TIME").value, Value::string("local_time"));
    }

    #[test]
    fn test_aliases_are_invisible() {
        assert!(find("NAN").invisible);
        assert!(find("TRUE").invisible);
        assert!(!find("NaN").invisible);
    }
}
