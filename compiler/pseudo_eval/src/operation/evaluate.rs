//! Binary and logical operators.
//!
//! Dispatch is on the left operand's type; the right operand is coerced to
//! match. Combinations with no defined meaning evaluate to nil.

use std::cmp::Ordering;
use std::rc::Rc;

use pseudo_ir::BinaryOperator;

use crate::context::Context;
use crate::value::{ScriptMap, Shared};
use crate::{EvalResult, Value};

use super::Operation;

#[derive(Debug)]
pub struct Evaluate {
    pub operator: BinaryOperator,
    pub left: Operation,
    pub right: Operation,
}

impl Evaluate {
    pub fn handle(&self, ctx: &Rc<Context>) -> EvalResult {
        let left = self.left.handle(ctx)?;
        match self.operator {
            BinaryOperator::And if !left.to_truthy() => Ok(Value::from(false)),
            BinaryOperator::Or if left.to_truthy() => Ok(Value::from(true)),
            BinaryOperator::And | BinaryOperator::Or => {
                Ok(Value::from(self.right.handle(ctx)?.to_truthy()))
            }
            operator => Ok(apply(operator, &left, &self.right.handle(ctx)?)),
        }
    }
}

/// Apply a non-logical operator to two evaluated operands.
pub(crate) fn apply(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    match left {
        Value::Nil => match operator {
            BinaryOperator::Equal => Value::from(right.is_nil()),
            BinaryOperator::NotEqual => Value::from(!right.is_nil()),
            _ => Value::Nil,
        },
        Value::Number(_) | Value::Boolean(_) => number(operator, left, right),
        Value::String(_) => string(operator, left, right),
        Value::List(a) => match right {
            Value::List(b) => list(operator, a, b),
            _ => Value::Nil,
        },
        Value::Map(a) => match right {
            Value::Map(b) => map(operator, a, b),
            _ => Value::Nil,
        },
        Value::Function(_) | Value::Interface(_) => match operator {
            BinaryOperator::Equal => Value::from(left == right),
            BinaryOperator::NotEqual => Value::from(left != right),
            _ => Value::Nil,
        },
    }
}

fn number(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    let (a, b) = (left.to_number(), right.to_number());
    let (x, y) = (left.to_int(), right.to_int());
    match operator {
        BinaryOperator::Add => Value::from(a + b),
        BinaryOperator::Sub => Value::from(a - b),
        BinaryOperator::Mul => Value::from(a * b),
        BinaryOperator::Div => Value::from(a / b),
        BinaryOperator::Mod => Value::from(a % b),
        BinaryOperator::BitXor => Value::from(x ^ y),
        BinaryOperator::BitOr => Value::from(x | y),
        BinaryOperator::BitAnd => Value::from(x & y),
        BinaryOperator::LeftShift => Value::from(x.wrapping_shl(y as u32)),
        BinaryOperator::RightShift => Value::from(x.wrapping_shr(y as u32)),
        BinaryOperator::UnsignedRightShift => {
            Value::from(f64::from((x as u32).wrapping_shr(y as u32)))
        }
        BinaryOperator::LessThan => Value::from(a < b),
        BinaryOperator::GreaterThan => Value::from(a > b),
        BinaryOperator::LessThanOrEqual => Value::from(a <= b),
        BinaryOperator::GreaterThanOrEqual => Value::from(a >= b),
        BinaryOperator::Equal => Value::from(a == b),
        BinaryOperator::NotEqual => Value::from(a != b),
        BinaryOperator::And | BinaryOperator::Or => Value::Nil,
    }
}

fn string(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    let (a, b) = (left.to_string(), right.to_string());
    let ordering = a.cmp(&b);
    match operator {
        BinaryOperator::Add => Value::from(a + &b),
        BinaryOperator::LessThan => Value::from(ordering == Ordering::Less),
        BinaryOperator::GreaterThan => Value::from(ordering == Ordering::Greater),
        BinaryOperator::LessThanOrEqual => Value::from(ordering != Ordering::Greater),
        BinaryOperator::GreaterThanOrEqual => Value::from(ordering != Ordering::Less),
        BinaryOperator::Equal => Value::from(ordering == Ordering::Equal),
        BinaryOperator::NotEqual => Value::from(ordering != Ordering::Equal),
        _ => Value::Nil,
    }
}

/// `+` concatenates into a new list; comparisons use element counts,
/// equality is structural.
fn list(operator: BinaryOperator, a: &Shared<Vec<Value>>, b: &Shared<Vec<Value>>) -> Value {
    match operator {
        BinaryOperator::Add => {
            let mut merged = a.borrow().clone();
            merged.extend(b.borrow().iter().cloned());
            Value::list(merged)
        }
        BinaryOperator::Equal => Value::from(a == b),
        BinaryOperator::NotEqual => Value::from(a != b),
        operator => compare_counts(operator, a.borrow().len(), b.borrow().len()),
    }
}

/// `+` merges into a new map with the right side winning.
fn map(operator: BinaryOperator, a: &Shared<ScriptMap>, b: &Shared<ScriptMap>) -> Value {
    match operator {
        BinaryOperator::Add => {
            let mut merged = a.borrow().clone();
            merged.extend(
                b.borrow()
                    .iter()
                    .map(|(key, value)| (key.clone(), value.clone())),
            );
            Value::map(merged)
        }
        BinaryOperator::Equal => Value::from(a == b),
        BinaryOperator::NotEqual => Value::from(a != b),
        operator => compare_counts(operator, a.borrow().len(), b.borrow().len()),
    }
}

fn compare_counts(operator: BinaryOperator, a: usize, b: usize) -> Value {
    match operator {
        BinaryOperator::LessThan => Value::from(a < b),
        BinaryOperator::GreaterThan => Value::from(a > b),
        BinaryOperator::LessThanOrEqual => Value::from(a <= b),
        BinaryOperator::GreaterThanOrEqual => Value::from(a >= b),
        _ => Value::Nil,
    }
}
