//! Functions backed by the host job: `rand` and `param`.

use super::{Arity, Function, NativeFunction, Param, check_params, constant_value, value_node};
use crate::api::HostJob;
use crate::errors::ExpressionError;
use crate::evaluator::ExpressionEvaluator;
use crate::types::ExpressionType;
use crate::values::Value;
use core::cell::RefCell;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

const GROUP: &str = "process";

fn seed_of(value: f64, host: &dyn HostJob) -> u64 {
    if value.is_finite() {
        value.trunc() as i64 as u64
    } else {
        host.random_seed()
    }
}

/// `rand([seed])`: uniform `Double` in `[0, 1)`, never folded.
///
/// Without a seed, or with a constant one, a single generator advances from
/// row to row. A per-row seed restarts the generator on every row, so equal
/// seeds give equal values.
fn rand_function(host: Rc<dyn HostJob>) -> NativeFunction {
    NativeFunction::new("rand", GROUP, "rand([seed])", Arity::range(0, 1), move |_, args| {
        check_params("rand", args, &[Param::Numeric])?;
        let fixed_seed = match args.first() {
            None => Some(host.random_seed()),
            Some(arg) => constant_value(arg)?
                .map(|v| seed_of(v.as_f64().unwrap_or(f64::NAN), host.as_ref())),
        };
        if let Some(seed) = fixed_seed {
            let rng = RefCell::new(StdRng::seed_from_u64(seed));
            return Ok(ExpressionEvaluator::double(false, move |_| {
                Ok(rng.borrow_mut().r#gen::<f64>())
            }));
        }
        let seed = args[0].clone();
        let host = host.clone();
        Ok(ExpressionEvaluator::double(false, move |s| {
            let seed = seed_of(seed.numeric_value(s)?, host.as_ref());
            Ok(StdRng::seed_from_u64(seed).r#gen::<f64>())
        }))
    })
}

/// `param(operator, parameter)`: text of a parameter of an upstream step.
fn param_function(host: Rc<dyn HostJob>) -> NativeFunction {
    NativeFunction::new("param", GROUP, "param(operator, parameter)", Arity::exact(2), move |_, args| {
        check_params("param", args, &[Param::Text])?;
        let host = host.clone();
        Ok(value_node(ExpressionType::String, args, move |v| {
            let (Some(operator), Some(parameter)) = (v[0].as_str(), v[1].as_str()) else {
                return Ok(Value::String(None));
            };
            host.parameter(operator, parameter)
                .map(Value::string)
                .ok_or_else(|| {
                    ExpressionError::value_error(
                        "param",
                        format!("unknown parameter '{parameter}' of operator '{operator}'"),
                    )
                })
        }))
    })
}

pub fn host_functions(host: Rc<dyn HostJob>) -> Vec<Rc<dyn Function>> {
    vec![
        Rc::new(rand_function(host.clone())) as Rc<dyn Function>,
        Rc::new(param_function(host)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Job;

    impl HostJob for Job {
        fn parameter(&self, _: &str, _: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_seed_of() {
        assert_eq!(seed_of(42.9, &Job), 42);
        assert_eq!(seed_of(f64::NAN, &Job), 2001);
        assert_eq!(seed_of(-1.0, &Job), u64::MAX);
    }

    #[test]
    fn test_host_functions_are_named() {
        let names: Vec<_> = host_functions(Rc::new(Job))
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, ["rand", "param"]);
    }
}
