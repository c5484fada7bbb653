//! camelCase ⇄ snake_case renaming between application fields and columns.
//!
//! Transforms are flat: object keys are renamed but values are left alone,
//! only array elements recurse. Falsy values (`null`, `false`, `0`, `""`)
//! and the `"*"` wildcard pass through untouched so "select everything"
//! markers and absent values can be handed over blindly.
//!
//! Word boundaries follow the usual rules (`createdAt` ⇄ `created_at`,
//! `userID` → `user_id`, `address1` ⇄ `address_1`). Inputs whose boundaries
//! cannot be recovered, such as runs of single-letter words, are not
//! guaranteed to round-trip.

use crate::domain::Record;
use serde_json::Value;

/// Column selector meaning "every column"
pub const WILDCARD: &str = "*";

/// Rename every key of a JSON object to camelCase, recursing into arrays
pub fn to_camel(value: Value) -> Value {
    transform(value, camel_case)
}

/// Rename every key of a JSON object to snake_case, recursing into arrays
pub fn to_snake(value: Value) -> Value {
    transform(value, snake_case)
}

/// camelCase the keys of a single record
pub fn camel_keys(record: Record) -> Record {
    rename_keys(record, camel_case)
}

/// snake_case the keys of a single record
pub fn snake_keys(record: Record) -> Record {
    rename_keys(record, snake_case)
}

/// `created_at` -> `createdAt`
pub fn camel_case(input: &str) -> String {
    if input == WILDCARD {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    for (index, word) in split_words(input).iter().enumerate() {
        if index == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }
    out
}

/// `createdAt` -> `created_at`
pub fn snake_case(input: &str) -> String {
    if input == WILDCARD {
        return input.to_string();
    }

    split_words(input)
        .iter()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

fn transform(value: Value, rename: fn(&str) -> String) -> Value {
    if is_passthrough(&value) {
        return value;
    }

    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| transform(item, rename))
                .collect(),
        ),
        Value::Object(map) => Value::Object(rename_keys(map, rename)),
        Value::String(s) => Value::String(rename(&s)),
        // `true` and non-zero numbers are not names
        other => other,
    }
}

fn rename_keys(record: Record, rename: fn(&str) -> String) -> Record {
    record
        .into_iter()
        .map(|(key, value)| (rename(&key), value))
        .collect()
}

fn is_passthrough(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == WILDCARD,
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Split an identifier into words on separators, lower→upper transitions,
/// the end of an acronym (`XMLHttp` → `XML`, `Http`) and letter⇄digit
/// transitions.
fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !current.is_empty() {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();

            let lower_to_upper = prev.is_lowercase() && c.is_uppercase();
            let acronym_end = prev.is_uppercase()
                && c.is_uppercase()
                && next.is_some_and(|n| n.is_lowercase());
            let digit_edge = (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_alphabetic() && c.is_numeric());

            if lower_to_upper || acronym_end || digit_edge {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}
