//! The global API table.

use std::cell::RefCell;
use std::f64::consts::PI;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustc_hash::{FxHashMap, FxHasher};

use crate::value::{Function, NativeCall, ScriptMap};
use crate::{EvalResult, Value};

/// Fresh built-in API table. Seeded generators created by `rng` are cached
/// in the returned table for as long as it lives.
pub fn builtin_api() -> ScriptMap {
    let mut api = ScriptMap::new();
    let mut define = |function: Function| {
        api.insert(function.name().to_string(), Value::from(function));
    };

    define(
        Function::native("print", |call| {
            call.ctx.print(&call.arg("message").to_string());
            Ok(Value::Nil)
        })
        .param("message"),
    );
    define(
        Function::native("wait", |call| {
            let millis = u64::try_from(call.arg("time").to_int()).unwrap_or(0);
            thread::sleep(Duration::from_millis(millis));
            Ok(Value::Nil)
        })
        .param_with_default("time", Value::from(1)),
    );
    define(
        Function::native("char", |call| {
            let code = match call.arg("value") {
                value @ Value::Number(_) => u32::try_from(value.to_int()).ok(),
                _ => None,
            };
            Ok(code
                .and_then(char::from_u32)
                .map(|c| Value::from(c.to_string()))
                .unwrap_or_default())
        })
        .param("value"),
    );
    define(
        Function::native("code", |call| {
            let code = match call.arg("value") {
                Value::String(s) => s.chars().next().map(|c| Value::from(f64::from(u32::from(c)))),
                _ => None,
            };
            Ok(code.unwrap_or_default())
        })
        .param("value"),
    );
    define(
        Function::native("str", |call| Ok(Value::from(call.arg("value").to_string())))
            .param("value"),
    );
    define(
        Function::native("val", |call| Ok(Value::from(call.arg("value").to_number())))
            .param("value"),
    );
    define(
        Function::native("range", range)
            .param("from")
            .param("to")
            .param_with_default("step", Value::from(1)),
    );

    let generators: Rc<RefCell<FxHashMap<i64, StdRng>>> = Rc::default();
    define(
        Function::native("rng", move |call| {
            let seed = match call.arg("seed") {
                Value::Nil => return Ok(Value::from(rand::thread_rng().gen::<f64>())),
                Value::String(s) => {
                    let mut hasher = FxHasher::default();
                    s.hash(&mut hasher);
                    hasher.finish() as i64
                }
                seed => i64::from(seed.to_int()),
            };
            let mut generators = generators.borrow_mut();
            let generator = generators
                .entry(seed)
                .or_insert_with(|| StdRng::seed_from_u64(seed as u64));
            Ok(Value::from(generator.gen::<f64>()))
        })
        .param("seed"),
    );

    for (name, op) in MATH {
        define(
            Function::native(name, move |call| Ok(Value::from(op(call.arg("value").to_number()))))
                .param("value"),
        );
    }
    api.insert("pi", Value::from(PI));

    api
}

const MATH: [(&str, fn(f64) -> f64); 11] = [
    ("abs", f64::abs),
    ("acos", f64::acos),
    ("asin", f64::asin),
    ("atan", f64::atan),
    ("ceil", f64::ceil),
    ("cos", f64::cos),
    ("floor", f64::floor),
    ("sin", f64::sin),
    ("sign", sign),
    ("round", f64::round_ties_even),
    ("sqrt", f64::sqrt),
];

/// -1, 0 or 1; NaN stays NaN.
fn sign(n: f64) -> f64 {
    if n.is_nan() || n == 0.0 {
        n
    } else {
        n.signum()
    }
}

/// Exclusive upper bound. A nil `to` counts from 0 to `from`; a negative
/// step counts down and a zero step yields nothing.
fn range(call: &NativeCall<'_>) -> EvalResult {
    let (from, to) = match call.arg("to") {
        Value::Nil => (0, call.arg("from").to_int()),
        to => (call.arg("from").to_int(), to.to_int()),
    };
    let step = call.arg("step").to_int();

    let mut items = Vec::new();
    let mut index = i64::from(from);
    let (to, step) = (i64::from(to), i64::from(step));
    match step {
        0 => {}
        step if step > 0 => {
            while index < to {
                items.push(Value::from(index as f64));
                index += step;
            }
        }
        step => {
            while index > to {
                items.push(Value::from(index as f64));
                index += step;
            }
        }
    }
    Ok(Value::list(items))
}
