use crate::compile::Comparator;
use serde_json::Value;
use std::cmp::Ordering;

/// Evaluate a comparison between two values.
///
/// Equality is strict, so values of different types are never equal.
/// The ordering comparators order numbers, strings and bools within
/// their own type, and are false across types.
pub(crate) fn compare_values(left: &Value, comparator: Comparator, right: &Value) -> bool {
    match comparator {
        Comparator::Equal => left == right,
        Comparator::NotEqual => left != right,
        _ => match ordering(left, right) {
            Some(ordering) => satisfies(ordering, comparator),
            None => false,
        },
    }
}

/// Evaluate a comparison between two numbers.
pub(crate) fn compare_numbers(left: f64, comparator: Comparator, right: f64) -> bool {
    match comparator {
        Comparator::Equal => left == right,
        Comparator::NotEqual => left != right,
        _ => match left.partial_cmp(&right) {
            Some(ordering) => satisfies(ordering, comparator),
            None => false,
        },
    }
}

/// Reduce a value to a number.
///
/// Strings parse when they hold a number and count as zero otherwise,
/// bools count as one and zero, and everything else counts as zero.
pub(crate) fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(string) => string.trim().parse().unwrap_or(0.0),
        Value::Bool(bool) => {
            if *bool {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

fn ordering(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => left
            .as_f64()
            .zip(right.as_f64())
            .and_then(|(left, right)| left.partial_cmp(&right)),
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        (Value::Bool(left), Value::Bool(right)) => Some(left.cmp(right)),
        _ => None,
    }
}

fn satisfies(ordering: Ordering, comparator: Comparator) -> bool {
    match comparator {
        Comparator::Greater => ordering == Ordering::Greater,
        Comparator::Lesser => ordering == Ordering::Less,
        Comparator::GreaterOrEqual => ordering != Ordering::Less,
        Comparator::LesserOrEqual => ordering != Ordering::Greater,
        Comparator::Equal | Comparator::NotEqual => {
            unreachable!("equality never reaches ordering")
        }
    }
}
