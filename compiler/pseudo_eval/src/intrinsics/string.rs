//! String intrinsics. Indexes and lengths count characters.

use crate::value::{wrap_index, Function, NativeCall};
use crate::{EvalResult, Value};

pub(super) fn functions() -> Vec<Function> {
    vec![
        Function::native("trim", |call| {
            Ok(with_str(call, |s| Value::from(s.trim())))
        }),
        Function::native("toUpperCase", |call| {
            Ok(with_str(call, |s| Value::from(s.to_uppercase())))
        }),
        Function::native("toLowerCase", |call| {
            Ok(with_str(call, |s| Value::from(s.to_lowercase())))
        }),
        Function::native("length", |call| {
            Ok(Value::from(receiver(call).map_or(0, |s| s.chars().count())))
        }),
        Function::native("indexOf", |call| {
            let needle = call.arg("value").to_string();
            Ok(char_position(receiver(call), |s| s.find(needle.as_str())))
        })
        .param("value"),
        Function::native("contains", |call| {
            let needle = call.arg("value").to_string();
            Ok(Value::from(
                receiver(call).is_some_and(|s| s.contains(needle.as_str())),
            ))
        })
        .param("value"),
        Function::native("lastIndexOf", |call| {
            let needle = call.arg("value").to_string();
            Ok(char_position(receiver(call), |s| s.rfind(needle.as_str())))
        })
        .param("value"),
        Function::native("replace", replace)
            .param("value")
            .param_with_default("replaceWith", Value::from("")),
        Function::native("split", split).param_with_default("delimiter", Value::from(",")),
        Function::native("slice", slice)
            .param_with_default("from", Value::from(0))
            .param("to"),
    ]
}

fn receiver<'a>(call: &'a NativeCall<'_>) -> Option<&'a str> {
    match call.this {
        Value::String(s) => Some(&**s),
        _ => None,
    }
}

fn with_str(call: &NativeCall<'_>, f: impl FnOnce(&str) -> Value) -> Value {
    receiver(call).map(f).unwrap_or_default()
}

/// Convert a byte offset search into a character index, -1 when absent.
fn char_position(s: Option<&str>, search: impl FnOnce(&str) -> Option<usize>) -> Value {
    let index = s
        .and_then(|s| search(s).map(|offset| s[..offset].chars().count()))
        .and_then(|index| i32::try_from(index).ok())
        .unwrap_or(-1);
    Value::from(index)
}

fn replace(call: &NativeCall<'_>) -> EvalResult {
    let Some(s) = receiver(call) else {
        return Ok(Value::Nil);
    };
    let pattern = call.arg("value").to_string();
    if pattern.is_empty() {
        return Ok(call.this.clone());
    }
    let with = call.arg("replaceWith").to_string();
    Ok(Value::from(s.replace(pattern.as_str(), &with)))
}

fn split(call: &NativeCall<'_>) -> EvalResult {
    let Some(s) = receiver(call) else {
        return Ok(Value::Nil);
    };
    let delimiter = call.arg("delimiter").to_string();
    if delimiter.is_empty() {
        return Ok(Value::list(vec![call.this.clone()]));
    }
    Ok(Value::list(
        s.split(delimiter.as_str()).map(Value::from).collect(),
    ))
}

/// Inclusive on both ends; `to` defaults to the last character. Any
/// bound outside the string, or `from > to`, gives nil.
fn slice(call: &NativeCall<'_>) -> EvalResult {
    let Some(s) = receiver(call) else {
        return Ok(Value::Nil);
    };
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
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
    Ok(Value::from(chars[start..=end].iter().collect::<String>()))
}
