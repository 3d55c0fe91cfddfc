//! List intrinsics. Mutators work in place on the shared list.

use crate::value::{wrap_index, Function, NativeCall, Path, Shared};
use crate::{EvalResult, Value};

use super::callback;

pub(super) fn functions() -> Vec<Function> {
    vec![
        Function::native("hasIndex", |call| {
            let key = Path::single(call.arg("value").to_string());
            Ok(Value::from(receiver(call).is_some() && call.this.has(&key)))
        })
        .param("value"),
        Function::native("join", |call| {
            let Some(list) = receiver(call) else {
                return Ok(Value::Nil);
            };
            let delimiter = call.arg("delimiter").to_string();
            let items = list
                .borrow()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>();
            Ok(Value::from(items.join(&delimiter)))
        })
        .param_with_default("delimiter", Value::from(",")),
        Function::native("push", |call| {
            Ok(Value::from(receiver(call).is_some_and(|list| {
                list.borrow_mut().push(call.arg("value"));
                true
            })))
        })
        .param("value"),
        Function::native("unshift", |call| {
            Ok(Value::from(receiver(call).is_some_and(|list| {
                list.borrow_mut().insert(0, call.arg("value"));
                true
            })))
        })
        .param("value"),
        Function::native("shift", |call| {
            let item = receiver(call).and_then(|list| {
                let mut list = list.borrow_mut();
                (!list.is_empty()).then(|| list.remove(0))
            });
            Ok(item.unwrap_or_default())
        }),
        Function::native("pop", |call| {
            Ok(receiver(call)
                .and_then(|list| list.borrow_mut().pop())
                .unwrap_or_default())
        }),
        Function::native("removeAt", |call| {
            let index = i64::from(call.arg("index").to_int());
            let removed = receiver(call).is_some_and(|list| {
                let mut list = list.borrow_mut();
                match wrap_index(index, list.len()) {
                    Some(slot) => {
                        list.remove(slot);
                        true
                    }
                    None => false,
                }
            });
            Ok(Value::from(removed))
        })
        .param("index"),
        Function::native("length", |call| {
            Ok(Value::from(receiver(call).map_or(0, |list| list.borrow().len())))
        }),
        Function::native("slice", slice)
            .param_with_default("from", Value::from(0))
            .param("to"),
        Function::native("values", |call| {
            Ok(receiver(call).map_or(Value::Nil, |list| Value::list(list.borrow().clone())))
        }),
        Function::native("keys", |call| {
            Ok(receiver(call).map_or(Value::Nil, |list| {
                Value::list((0..list.borrow().len()).map(Value::from).collect())
            }))
        }),
        Function::native("indexOf", |call| {
            let needle = call.arg("value").to_string();
            let index = receiver(call)
                .and_then(|list| {
                    list.borrow()
                        .iter()
                        .position(|item| item.to_string() == needle)
                })
                .map_or(Value::from(-1), Value::from);
            Ok(index)
        })
        .param("value"),
        Function::native("find", |call| {
            let (Some(items), Some(f)) = (snapshot(call), callback(call)) else {
                return Ok(Value::Nil);
            };
            for (index, item) in items.into_iter().enumerate() {
                let found = f.run(call.ctx, call.this.clone(), vec![item.clone(), Value::from(index)])?;
                if found.to_truthy() {
                    return Ok(item);
                }
            }
            Ok(Value::Nil)
        })
        .param("fn"),
        Function::native("forEach", |call| {
            let (Some(items), Some(f)) = (snapshot(call), callback(call)) else {
                return Ok(Value::Nil);
            };
            for (index, item) in items.into_iter().enumerate() {
                f.run(call.ctx, call.this.clone(), vec![item, Value::from(index)])?;
            }
            Ok(Value::Nil)
        })
        .param("fn"),
        Function::native("map", |call| {
            let (Some(items), Some(f)) = (snapshot(call), callback(call)) else {
                return Ok(Value::Nil);
            };
            let mapped = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| f.run(call.ctx, call.this.clone(), vec![item, Value::from(index)]))
                .collect::<EvalResult<Vec<_>>>()?;
            Ok(Value::list(mapped))
        })
        .param("fn"),
        Function::native("reduce", |call| {
            let (Some(items), Some(f)) = (snapshot(call), callback(call)) else {
                return Ok(Value::Nil);
            };
            let mut acc = call.arg("initalValue");
            for (index, item) in items.into_iter().enumerate() {
                acc = f.run(call.ctx, call.this.clone(), vec![acc, item, Value::from(index)])?;
            }
            Ok(acc)
        })
        .param("fn")
        .param("initalValue"),
    ]
}

fn receiver<'a>(call: &'a NativeCall<'_>) -> Option<&'a Shared<Vec<Value>>> {
    match call.this {
        Value::List(list) => Some(list),
        _ => None,
    }
}

/// Copy of the elements, so callbacks may mutate the list while it is
/// being walked.
fn snapshot(call: &NativeCall<'_>) -> Option<Vec<Value>> {
    receiver(call).map(|list| list.borrow().clone())
}

/// Inclusive on both ends; `to` defaults to the last element.
fn slice(call: &NativeCall<'_>) -> EvalResult {
    let Some(list) = receiver(call) else {
        return Ok(Value::Nil);
    };
    let list = list.borrow();
    let len = list.len();
    let from = i64::from(call.arg("from").to_int());
    let to = match call.arg("to") {
        Value::Nil => len as i64 - 1,
        to => i64::from(to.to_int()),
    };
    let (Some(start), Some(end)) = (wrap_index(from, len), wrap_index(to, len)) else {
        return Ok(Value::Nil);
    };
    if start > end {
        return Ok(Value::Nil);
    }
    Ok(Value::list(list[start..=end].to_vec()))
}
