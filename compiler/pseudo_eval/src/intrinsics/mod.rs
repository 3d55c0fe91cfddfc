//! Built-in functions.
//!
//! Two families live here:
//! - the global API table (`print`, `range`, math...) installed into the
//!   API context of every run, see [`builtin_api`];
//! - per-type intrinsics reached through a value (`s.trim`, `l.push`),
//!   resolved by [`Intrinsics::lookup`] when a single-segment path misses
//!   on a string, list or map.
//!
//! Intrinsics receive their receiver as `this` and degrade to a neutral
//! result (nil, `false`, `0`, `-1`) when called detached from one.

mod api;
mod list;
mod map;
mod string;

pub use api::builtin_api;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::value::{Function, NativeCall};
use crate::Value;

/// Dispatch tables for per-type intrinsics.
pub struct Intrinsics {
    string: FxHashMap<String, Value>,
    list: FxHashMap<String, Value>,
    map: FxHashMap<String, Value>,
}

impl Intrinsics {
    pub fn new() -> Self {
        Intrinsics {
            string: table(string::functions()),
            list: table(list::functions()),
            map: table(map::functions()),
        }
    }

    /// Intrinsic `name` of the receiver's type.
    pub fn lookup(&self, receiver: &Value, name: &str) -> Option<Value> {
        let table = match receiver {
            Value::String(_) => &self.string,
            Value::List(_) => &self.list,
            Value::Map(_) => &self.map,
            _ => return None,
        };
        table.get(name).cloned()
    }

    /// Map intrinsic reachable as a bare name from any scope.
    pub fn map_function(&self, name: &str) -> Option<Value> {
        self.map.get(name).cloned()
    }
}

impl Default for Intrinsics {
    fn default() -> Self {
        Intrinsics::new()
    }
}

fn table(functions: Vec<Function>) -> FxHashMap<String, Value> {
    functions
        .into_iter()
        .map(|function| (function.name().to_string(), Value::from(function)))
        .collect()
}

/// The `fn` argument of a higher-order intrinsic, if it is callable.
fn callback(call: &NativeCall<'_>) -> Option<Rc<Function>> {
    match call.arg("fn") {
        Value::Function(function) => Some(function),
        _ => None,
    }
}
