//! A serializable predicate language over JSON values.
//!
//! [`Condition`] is plain data: an operator tag plus operands. It round-trips
//! losslessly through JSON and is evaluated by [`Condition::evaluate`], which
//! never executes anything that came out of a serialized document. Query
//! field filters use it, and validator code outside this crate can persist
//! its thresholds the same way.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A predicate over an optional JSON value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Condition {
    /// The value is present.
    Exists,
    Equals { value: Value },
    NotEquals { value: Value },
    LessThan { value: f64 },
    LessOrEqual { value: f64 },
    GreaterThan { value: f64 },
    GreaterOrEqual { value: f64 },
    /// Inclusive range.
    Between { min: f64, max: f64 },
    /// Substring of a string, or element of an array.
    Contains { value: Value },
    OneOf { values: Vec<Value> },
    And { conditions: Vec<Condition> },
    Or { conditions: Vec<Condition> },
    Not { condition: Box<Condition> },
}

impl Condition {
    /// Evaluates the condition. `None` means the subject value is absent.
    ///
    /// Numeric operators are false for non-numeric or absent subjects.
    pub fn evaluate(&self, subject: Option<&Value>) -> bool {
        match self {
            Condition::Exists => subject.is_some(),
            Condition::Equals { value } => subject == Some(value),
            Condition::NotEquals { value } => subject != Some(value),
            Condition::LessThan { value } => number(subject).is_some_and(|n| n < *value),
            Condition::LessOrEqual { value } => number(subject).is_some_and(|n| n <= *value),
            Condition::GreaterThan { value } => number(subject).is_some_and(|n| n > *value),
            Condition::GreaterOrEqual { value } => number(subject).is_some_and(|n| n >= *value),
            Condition::Between { min, max } => {
                number(subject).is_some_and(|n| *min <= n && n <= *max)
            }
            Condition::Contains { value } => match (subject, value) {
                (Some(Value::String(haystack)), Value::String(needle)) => {
                    haystack.contains(needle.as_str())
                }
                (Some(Value::Array(items)), needle) => items.contains(needle),
                _ => false,
            },
            Condition::OneOf { values } => subject.is_some_and(|s| values.contains(s)),
            Condition::And { conditions } => conditions.iter().all(|c| c.evaluate(subject)),
            Condition::Or { conditions } => conditions.iter().any(|c| c.evaluate(subject)),
            Condition::Not { condition } => !condition.evaluate(subject),
        }
    }
}

fn number(subject: Option<&Value>) -> Option<f64> {
    subject.and_then(Value::as_f64)
}
