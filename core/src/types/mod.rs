//! Type tags of the expression language.
//!
//! Every evaluator node carries exactly one of these tags. `Integer` and
//! `Double` share the same `f64` storage; `Integer` only promises that every
//! value is a whole number (or NaN for missing).

use core::fmt;
use core::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExpressionType {
    Integer,
    Double,
    String,
    Boolean,
    Instant,
    LocalTime,
    StringSet,
    StringList,
}

impl ExpressionType {
    pub const ALL: [ExpressionType; 8] = [
        ExpressionType::Integer,
        ExpressionType::Double,
        ExpressionType::String,
        ExpressionType::Boolean,
        ExpressionType::Instant,
        ExpressionType::LocalTime,
        ExpressionType::StringSet,
        ExpressionType::StringList,
    ];

    /// True for the two tags backed by `f64` storage.
    pub fn is_numeric(self) -> bool {
        matches!(self, ExpressionType::Integer | ExpressionType::Double)
    }

    /// Lowercase name used by `TYPE_*` constants and in messages.
    pub fn name(self) -> &'static str {
        match self {
            ExpressionType::Integer => "integer",
            ExpressionType::Double => "double",
            ExpressionType::String => "string",
            ExpressionType::Boolean => "boolean",
            ExpressionType::Instant => "instant",
            ExpressionType::LocalTime => "local_time",
            ExpressionType::StringSet => "string_set",
            ExpressionType::StringList => "string_list",
        }
    }

    /// Result tag of an arithmetic operation over two numeric tags.
    ///
    /// Only `Integer op Integer` may stay `Integer`; callers decide whether
    /// the operator itself keeps integrality.
    pub fn numeric_join(self, other: ExpressionType) -> ExpressionType {
        if self == ExpressionType::Integer && other == ExpressionType::Integer {
            ExpressionType::Integer
        } else {
            ExpressionType::Double
        }
    }
}

impl fmt::Display for ExpressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a type name is not one of the eight tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeName(pub String);

impl fmt::Display for UnknownTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type name '{}'", self.0)
    }
}

impl FromStr for ExpressionType {
    type Err = UnknownTypeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ExpressionType::ALL
            .into_iter()
            .find(|ty| ty.name() == lowered)
            .ok_or_else(|| UnknownTypeName(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_join() {
        use ExpressionType::*;
        assert_eq!(Integer.numeric_join(Integer), Integer);
        assert_eq!(Integer.numeric_join(Double), Double);
        assert_eq!(Double.numeric_join(Integer), Double);
    }

    #[test]
    fn test_names_round_trip() {
        for ty in ExpressionType::ALL {
            assert_eq!(ty.name().parse::<ExpressionType>().unwrap(), ty);
        }
        assert_eq!(
            "LOCAL_TIME".parse::<ExpressionType>().unwrap(),
            ExpressionType::LocalTime
        );
        assert!("real".parse::<ExpressionType>().is_err());
    }
}
