#![allow(clippy::unwrap_used)]

use super::*;
use crate::errors::EvalErrorKind;
use pretty_assertions::assert_eq;

fn list(items: &[f64]) -> Value {
    Value::list(items.iter().copied().map(Value::from).collect())
}

fn nested() -> Value {
    let mut inner = ScriptMap::new();
    inner.insert("items", list(&[1.0, 2.0, 3.0]));
    let mut outer = ScriptMap::new();
    outer.insert("inner", Value::map(inner));
    outer.insert("name", Value::from("box"));
    Value::map(outer)
}

#[test]
fn display() {
    assert_eq!(Value::Nil.to_string(), "null");
    assert_eq!(Value::from(true).to_string(), "true");
    assert_eq!(Value::from(3.0).to_string(), "3");
    assert_eq!(Value::from(0.5).to_string(), "0.5");
    assert_eq!(list(&[1.0, 2.0]).to_string(), "[ 1, 2 ]");
    assert_eq!(nested().to_string(), "{ inner: { items: [ 1, 2, 3 ] }, name: box }");
}

#[test]
fn number_formatting() {
    assert_eq!(format_number(-0.25), "-0.25");
    assert_eq!(format_number(1e20), "1E+20");
    assert_eq!(format_number(1.5e-7), "1.5E-07");
    assert_eq!(format_number(f64::NAN), "NaN");
    assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
}

#[test]
fn conversions() {
    assert_eq!(Value::from(" 42 ").to_number(), 42.0);
    assert_eq!(Value::from("abc").to_number(), 0.0);
    assert!(Value::Nil.to_number().is_nan());
    assert_eq!(Value::from(true).to_int(), 1);
    assert_eq!(Value::from(-3.9).to_int(), -3);
    assert_eq!(Value::from(f64::NAN).to_int(), 0);
}

#[test]
fn truthiness() {
    assert!(!Value::Nil.to_truthy());
    assert!(!Value::from(0).to_truthy());
    assert!(!Value::from("").to_truthy());
    assert!(!list(&[]).to_truthy());
    assert!(Value::from("0").to_truthy());
    assert!(list(&[0.0]).to_truthy());
}

#[test]
fn type_names() {
    assert_eq!(Value::Nil.type_name(), "null");
    assert_eq!(list(&[]).type_name(), "list");
    let mut class = ScriptMap::new();
    class.insert("classID", Value::from("Animal"));
    assert_eq!(Value::map(class).type_name(), "Animal");
    assert_eq!(Value::from(Interface::new("file")).type_name(), "file");
}

#[test]
fn get_walks_nested_paths() {
    let intrinsics = Intrinsics::new();
    let value = nested();
    assert_eq!(
        value.get(&Path::parse("inner.items.1"), &intrinsics).unwrap(),
        Value::from(2)
    );
    assert_eq!(
        value.get(&Path::parse("inner.items.-1"), &intrinsics).unwrap(),
        Value::from(3)
    );
    assert_eq!(value.get(&Path::parse("missing"), &intrinsics).unwrap(), Value::Nil);
    assert_eq!(
        value.get(&Path::parse("name.0"), &intrinsics).unwrap(),
        Value::from("b")
    );
}

#[test]
fn get_reports_bad_indexes() {
    let intrinsics = Intrinsics::new();
    let err = list(&[1.0]).get(&Path::single("5"), &intrinsics).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::ListIndexOutOfRange { index: 5 });

    let err = Value::from("ab").get(&Path::single("-3"), &intrinsics).unwrap_err();
    assert_eq!(err.kind, EvalErrorKind::StringIndexOutOfRange { index: -3 });

    let err = Value::from(1).get(&Path::single("x"), &intrinsics).unwrap_err();
    assert_eq!(err.message(), "Cannot get path x.");
}

#[test]
fn get_falls_back_to_intrinsics() {
    let intrinsics = Intrinsics::new();
    let length = list(&[1.0]).get(&Path::single("length"), &intrinsics).unwrap();
    assert!(matches!(length, Value::Function(ref f) if f.name() == "length"));

    // Stored keys win over intrinsics of the same name.
    let mut map = ScriptMap::new();
    map.insert("length", Value::from(9));
    let value = Value::map(map);
    assert_eq!(value.get(&Path::single("length"), &intrinsics).unwrap(), Value::from(9));
}

#[test]
fn set_writes_through_paths() {
    let value = nested();
    value.set(&Path::parse("inner.items.0"), Value::from(10)).unwrap();
    value.set(&Path::parse("inner.flag"), Value::from(true)).unwrap();

    assert_eq!(value.lookup(&Path::parse("inner.items.0")), Some(Value::from(10)));
    assert_eq!(value.lookup(&Path::parse("inner.flag")), Some(Value::from(true)));
}

#[test]
fn set_rejects_immutable_targets() {
    let err = Value::from("abc").set(&Path::single("0"), Value::Nil).unwrap_err();
    assert_eq!(err.message(), "Mutable operations are not allowed on string.");

    let err = Value::from(Interface::new("api"))
        .set(&Path::single("x"), Value::Nil)
        .unwrap_err();
    assert_eq!(err.message(), "Cannot set property on an interface");

    let err = nested()
        .set(&Path::parse("nowhere.x"), Value::Nil)
        .unwrap_err();
    assert_eq!(err.message(), "Cannot set path nowhere.x.");
}

#[test]
fn containers_alias_and_fork_copies() {
    let original = list(&[1.0]);
    let alias = original.clone();
    let copy = original.fork();
    alias.set(&Path::single("0"), Value::from(5)).unwrap();

    assert_eq!(original, list(&[5.0]));
    assert_eq!(copy, list(&[1.0]));
}

#[test]
fn iteration() {
    let items: Vec<Value> = list(&[1.0, 2.0]).iter().unwrap().collect();
    assert_eq!(items, vec![Value::from(1), Value::from(2)]);

    let chars: Vec<String> = Value::from("hé").iter().unwrap().map(|v| v.to_string()).collect();
    assert_eq!(chars, vec!["h", "é"]);

    let mut map = ScriptMap::new();
    map.insert("a", Value::from(1));
    let entries: Vec<String> = Value::map(map).iter().unwrap().map(|v| v.to_string()).collect();
    assert_eq!(entries, vec!["{ key: a, value: 1 }"]);

    let err = Value::from(true).iter().err().unwrap();
    assert_eq!(err.message(), "Cannot iterate over boolean.");
}

#[test]
fn functions_compare_by_identity() {
    let f = Value::from(Function::native("f", |_| Ok(Value::Nil)));
    let g = Value::from(Function::native("f", |_| Ok(Value::Nil)));
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

#[test]
fn instantiate_flags_a_shallow_copy() {
    let mut map = ScriptMap::new();
    map.insert("x", Value::from(1));
    let instance = map.instantiate();
    assert!(instance.is_instance());
    assert!(!map.is_instance());
    assert_eq!(instance.get("x"), Some(&Value::from(1)));
}

#[test]
fn index_wrapping() {
    assert_eq!(wrap_index(-1, 3), Some(2));
    assert_eq!(wrap_index(3, 3), None);
    assert_eq!(wrap_index(-4, 3), None);
    assert_eq!(parse_index("2"), Some(2));
    assert_eq!(parse_index("1.5"), None);
    assert_eq!(parse_index("name"), None);
}

#[test]
fn path_draining() {
    let mut path = Path::parse("a.b.c");
    assert_eq!(path.next().as_deref(), Some("a"));
    assert_eq!(path.last().as_deref(), Some("c"));
    assert_eq!(path.to_string(), "b");
    assert_eq!(Path::parse("").len(), 0);
    assert_eq!(Path::parse("x.y").rest(), Path::single("y"));
}
