//! Runtime values.
//!
//! [`Value`] is a closed sum over the script types. Scalars are copied,
//! lists and maps are shared ([`Shared`]) so that `a = b` aliases a
//! container the way scripts expect, and functions/interfaces are
//! reference-counted.
//!
//! Every value answers the path protocol: [`Value::get`] reads through a
//! [`Path`] (falling back to per-type intrinsics for single-segment misses),
//! [`Value::set`] writes through one, and [`Value::iter`] yields the
//! elements a `for` loop walks.

mod function;
mod path;

pub use function::{Function, Interface, NativeCall, NativeFn};
pub use path::Path;

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::errors::{
    cannot_get_path, cannot_set_path, immutable_interface, immutable_string,
    list_index_out_of_range, not_iterable, string_index_out_of_range,
};
use crate::{EvalResult, Intrinsics};

/// Single-threaded shared container.
///
/// All list and map storage goes through this wrapper so aliasing is
/// explicit at the type level.
#[repr(transparent)]
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Shared(Rc::new(RefCell::new(value)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// True when both handles point at the same container.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Shared<T> {
    #[inline]
    fn clone(&self) -> Self {
        Shared(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Shared::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.borrow().fmt(f)
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.borrow() == *other.borrow()
    }
}

/// Insertion-ordered string-keyed map.
///
/// `is_instance` marks maps produced by `new`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptMap {
    entries: IndexMap<String, Value>,
    is_instance: bool,
}

impl ScriptMap {
    pub fn new() -> Self {
        ScriptMap::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite, keeping the original position of existing keys.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Remove a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    pub fn get_index(&self, index: usize) -> Option<(&String, &Value)> {
        self.entries.get_index(index)
    }

    /// Overwrite with every entry of `other`.
    pub fn extend(&mut self, other: impl IntoIterator<Item = (String, Value)>) {
        self.entries.extend(other);
    }

    #[inline]
    pub fn is_instance(&self) -> bool {
        self.is_instance
    }

    /// Shallow copy flagged as an instance.
    #[must_use]
    pub fn instantiate(&self) -> Self {
        ScriptMap {
            entries: self.entries.clone(),
            is_instance: true,
        }
    }
}

impl FromIterator<(String, Value)> for ScriptMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        ScriptMap {
            entries: iter.into_iter().collect(),
            is_instance: false,
        }
    }
}

/// A script value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    List(Shared<Vec<Value>>),
    Map(Shared<ScriptMap>),
    Function(Rc<Function>),
    Interface(Rc<Interface>),
}

impl Value {
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Shared::new(items))
    }

    pub fn map(map: ScriptMap) -> Self {
        Value::Map(Shared::new(map))
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Type tag as scripts see it. A map with a `classID` entry reports that
    /// entry instead of `map`.
    pub fn type_name(&self) -> String {
        match self {
            Value::Nil => "null".to_string(),
            Value::Boolean(_) => "boolean".to_string(),
            Value::Number(_) => "number".to_string(),
            Value::String(_) => "string".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Map(map) => match map.borrow().get("classID") {
                Some(class_id) => class_id.to_string(),
                None => "map".to_string(),
            },
            Value::Function(_) => "function".to_string(),
            Value::Interface(interface) => interface.name().to_string(),
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            Value::Nil
            | Value::List(_)
            | Value::Map(_)
            | Value::Function(_)
            | Value::Interface(_) => f64::NAN,
        }
    }

    /// Truncating 32-bit conversion; NaN becomes 0 and out-of-range
    /// values saturate.
    pub fn to_int(&self) -> i32 {
        match self {
            Value::Boolean(b) => i32::from(*b),
            Value::Number(_) | Value::String(_) => self.to_number() as i32,
            _ => 0,
        }
    }

    pub fn to_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(list) => !list.borrow().is_empty(),
            Value::Map(map) => !map.borrow().is_empty(),
            Value::Function(_) | Value::Interface(_) => true,
        }
    }

    /// Shallow copy: containers get a new top-level container, everything
    /// else is shared.
    #[must_use]
    pub fn fork(&self) -> Value {
        match self {
            Value::List(list) => Value::list(list.borrow().clone()),
            Value::Map(map) => Value::map(map.borrow().clone()),
            other => other.clone(),
        }
    }

    /// Element or entry count of a container.
    pub fn count(&self) -> Option<usize> {
        match self {
            Value::List(list) => Some(list.borrow().len()),
            Value::Map(map) => Some(map.borrow().len()),
            _ => None,
        }
    }

    /// Whether `path` resolves to a stored value (intrinsics excluded).
    pub fn has(&self, path: &Path) -> bool {
        self.lookup(path).is_some()
    }

    /// Walk `path` through stored values only.
    pub fn lookup(&self, path: &Path) -> Option<Value> {
        let Some(first) = path.first() else {
            return Some(self.clone());
        };
        let child = match self {
            Value::String(s) => parse_index(first).and_then(|index| char_at(s, index)),
            Value::List(list) => {
                let list = list.borrow();
                parse_index(first)
                    .and_then(|index| wrap_index(index, list.len()))
                    .map(|index| list[index].clone())
            }
            Value::Map(map) => map.borrow().get(first).cloned(),
            Value::Interface(interface) => interface.get(first),
            _ => None,
        }?;
        child.lookup(&path.rest())
    }

    /// Read through `path`.
    ///
    /// A missing key reads as nil. A single-segment miss on a string, list
    /// or map falls back to that type's intrinsic of the same name.
    pub fn get(&self, path: &Path, intrinsics: &Intrinsics) -> EvalResult {
        let Some(first) = path.first() else {
            return Ok(self.clone());
        };
        let child = match self {
            Value::String(s) => match parse_index(first) {
                Some(index) => {
                    Some(char_at(s, index).ok_or_else(|| string_index_out_of_range(index))?)
                }
                None => None,
            },
            Value::List(list) => match parse_index(first) {
                Some(index) => {
                    let list = list.borrow();
                    let slot = wrap_index(index, list.len())
                        .ok_or_else(|| list_index_out_of_range(index))?;
                    Some(list[slot].clone())
                }
                None => None,
            },
            Value::Map(map) => map.borrow().get(first).cloned(),
            Value::Interface(interface) => interface.get(first),
            _ => return Err(cannot_get_path(path)),
        };

        match child {
            Some(child) => child.get(&path.rest(), intrinsics),
            None if path.len() == 1 => Ok(intrinsics.lookup(self, first).unwrap_or_default()),
            None => Ok(Value::Nil),
        }
    }

    /// Write `value` at `path`.
    ///
    /// Everything before the last segment must already resolve to a
    /// container.
    pub fn set(&self, path: &Path, value: Value) -> EvalResult<()> {
        match self {
            Value::String(_) => return Err(immutable_string()),
            Value::Interface(_) => return Err(immutable_interface()),
            Value::List(_) | Value::Map(_) => {}
            _ => return Err(cannot_set_path(path)),
        }

        let mut parent = path.clone();
        let Some(last) = parent.last() else {
            return Err(cannot_set_path(path));
        };
        if !parent.is_empty() {
            let target = self.lookup(&parent).ok_or_else(|| cannot_set_path(path))?;
            return target.set(&Path::single(last), value);
        }

        match self {
            Value::List(list) => {
                let index = parse_index(&last).ok_or_else(|| cannot_set_path(path))?;
                let mut list = list.borrow_mut();
                let slot = wrap_index(index, list.len())
                    .ok_or_else(|| list_index_out_of_range(index))?;
                list[slot] = value;
            }
            Value::Map(map) => map.borrow_mut().insert(last, value),
            _ => return Err(cannot_set_path(path)),
        }
        Ok(())
    }

    /// Elements visited by `for ... in`.
    ///
    /// Lists yield their elements, maps yield `{key, value}` maps in
    /// insertion order and strings yield one-character strings.
    pub fn iter(&self) -> EvalResult<ValueIter> {
        match self {
            Value::List(list) => Ok(ValueIter::List(list.borrow().clone().into_iter())),
            Value::Map(map) => {
                let entries = map
                    .borrow()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect::<Vec<_>>();
                Ok(ValueIter::Map(entries.into_iter()))
            }
            Value::String(s) => Ok(ValueIter::Chars(
                s.chars().collect::<Vec<_>>().into_iter(),
            )),
            other => Err(not_iterable(other.type_name())),
        }
    }
}

/// Iteration over a copy of a container taken when the loop starts.
///
/// Changes the loop body makes to the container are not observed, so a
/// loop always ends after the elements that existed when it began.
pub enum ValueIter {
    List(std::vec::IntoIter<Value>),
    Map(std::vec::IntoIter<(String, Value)>),
    Chars(std::vec::IntoIter<char>),
}

impl Iterator for ValueIter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            ValueIter::List(items) => items.next(),
            ValueIter::Map(entries) => entries.next().map(|(key, value)| {
                let mut entry = ScriptMap::new();
                entry.insert("key", Value::from(key));
                entry.insert("value", value);
                Value::map(entry)
            }),
            ValueIter::Chars(chars) => chars.next().map(|c| Value::from(c.to_string())),
        }
    }
}

/// Parse an index segment. Only whole numbers are indexes.
pub(crate) fn parse_index(segment: &str) -> Option<i64> {
    segment.trim().parse::<i32>().ok().map(i64::from)
}

/// Resolve a possibly negative index against `len`.
pub(crate) fn wrap_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { len + index } else { index };
    if (0..len).contains(&index) {
        usize::try_from(index).ok()
    } else {
        None
    }
}

fn char_at(s: &str, index: i64) -> Option<Value> {
    let len = s.chars().count();
    let slot = wrap_index(index, len)?;
    s.chars().nth(slot).map(|c| Value::from(c.to_string()))
}

/// Render a number the way scripts print it: integral values without a
/// fraction, scientific notation for very large or very small magnitudes.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let scientific = format!("{n:e}");
    if let Some((mantissa, exponent)) = scientific.split_once('e') {
        if let Ok(exponent) = exponent.parse::<i32>() {
            if n != 0.0 && !(-5..15).contains(&exponent) {
                let sign = if exponent < 0 { '-' } else { '+' };
                return format!("{mantissa}E{sign}{:02}", exponent.abs());
            }
        }
    }
    n.to_string()
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("null"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::String(s) => f.write_str(s),
            Value::List(list) => {
                let items = list
                    .borrow()
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>();
                write!(f, "[ {} ]", items.join(", "))
            }
            Value::Map(map) => {
                let entries = map
                    .borrow()
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect::<Vec<_>>();
                write!(f, "{{ {} }}", entries.join(", "))
            }
            Value::Function(function) => function.fmt(f),
            Value::Interface(interface) => f.write_str(interface.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Structural for scalars and containers, identity for functions and
/// interfaces.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Interface(a), Value::Interface(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<ScriptMap> for Value {
    fn from(map: ScriptMap) -> Self {
        Value::map(map)
    }
}

impl From<Function> for Value {
    fn from(function: Function) -> Self {
        Value::Function(Rc::new(function))
    }
}

impl From<Interface> for Value {
    fn from(interface: Interface) -> Self {
        Value::Interface(Rc::new(interface))
    }
}

#[cfg(test)]
mod tests;
