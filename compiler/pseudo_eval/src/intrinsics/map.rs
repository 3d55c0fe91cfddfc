//! Map intrinsics. These are also reachable as bare names from any scope.

use crate::value::{Function, NativeCall, ScriptMap, Shared};
use crate::Value;

use super::callback;

pub(super) fn functions() -> Vec<Function> {
    vec![
        Function::native("hasIndex", |call| {
            let key = call.arg("value").to_string();
            Ok(Value::from(
                receiver(call).is_some_and(|map| map.borrow().contains_key(&key)),
            ))
        })
        .param("value"),
        Function::native("length", |call| {
            Ok(Value::from(receiver(call).map_or(0, |map| map.borrow().len())))
        }),
        Function::native("delete", |call| {
            let key = call.arg("key").to_string();
            Ok(Value::from(
                receiver(call).is_some_and(|map| map.borrow_mut().remove(&key).is_some()),
            ))
        })
        .param("key"),
        Function::native("values", |call| {
            Ok(receiver(call).map_or(Value::Nil, |map| {
                Value::list(map.borrow().iter().map(|(_, value)| value.clone()).collect())
            }))
        }),
        Function::native("keys", |call| {
            Ok(receiver(call).map_or(Value::Nil, |map| {
                Value::list(
                    map.borrow()
                        .iter()
                        .map(|(key, _)| Value::from(key.as_str()))
                        .collect(),
                )
            }))
        }),
        Function::native("indexOf", |call| {
            let needle = call.arg("value").to_string();
            let key = receiver(call).and_then(|map| {
                map.borrow()
                    .iter()
                    .find(|(_, value)| value.to_string() == needle)
                    .map(|(key, _)| Value::from(key.as_str()))
            });
            Ok(key.unwrap_or_default())
        })
        .param("value"),
        Function::native("find", |call| {
            let (Some(entries), Some(f)) = (snapshot(call), callback(call)) else {
                return Ok(Value::Nil);
            };
            for (key, value) in entries {
                let found = f.run(call.ctx, call.this.clone(), vec![value.clone(), Value::from(key)])?;
                if found.to_truthy() {
                    return Ok(value);
                }
            }
            Ok(Value::Nil)
        })
        .param("fn"),
        Function::native("forEach", |call| {
            let (Some(entries), Some(f)) = (snapshot(call), callback(call)) else {
                return Ok(Value::Nil);
            };
            for (key, value) in entries {
                f.run(call.ctx, call.this.clone(), vec![value, Value::from(key)])?;
            }
            Ok(Value::Nil)
        })
        .param("fn"),
    ]
}

fn receiver<'a>(call: &'a NativeCall<'_>) -> Option<&'a Shared<ScriptMap>> {
    match call.this {
        Value::Map(map) => Some(map),
        _ => None,
    }
}

fn snapshot(call: &NativeCall<'_>) -> Option<Vec<(String, Value)>> {
    receiver(call).map(|map| {
        map.borrow()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    })
}
