//! Runtime values and their canonical text forms.

pub mod display;
mod value;


pub use value::{Instant, LocalTime, StringList, StringSet, Value};
