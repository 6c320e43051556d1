//! In-process cross-store left join
//!
//! Registrar rows and teacher-store rows come from different stores, so they
//! are joined here rather than in SQL.

use crate::adapters::source::Row;
use serde_json::Value;
use std::collections::HashMap;

/// Left-join `left` to `right` on the normalized value of `key`
///
/// - output follows `left` order; matches for one left row follow `right` order
/// - a left row with no match (or no key) is emitted once, with every
///   right-hand column set to null
/// - on a column-name clash the left value wins
///
/// ```
/// use classroll::adapters::source::Row;
/// use classroll::core::normalize::left_join;
///
/// let students = vec![Row::new().with("student_id", "S1"), Row::new().with("student_id", 2)];
/// let classes = vec![Row::new().with("student_id", "2").with("class_id", "C1")];
/// let joined = left_join(&students, &classes, "student_id");
/// assert!(joined[0].is_null("class_id"));
/// assert_eq!(joined[1].get_str("class_id").as_deref(), Some("C1"));
/// ```
pub fn left_join(left: &[Row], right: &[Row], key: &str) -> Vec<Row> {
    let mut right_columns: Vec<&str> = Vec::new();
    let mut index: HashMap<String, Vec<&Row>> = HashMap::new();

    for row in right {
        for name in row.names() {
            if name != key && !right_columns.contains(&name) {
                right_columns.push(name);
            }
        }
        if let Some(k) = row.get_key(key) {
            index.entry(k).or_default().push(row);
        }
    }

    let mut joined = Vec::with_capacity(left.len());
    for row in left {
        let matches = row.get_key(key).and_then(|k| index.get(&k));
        match matches {
            Some(matches) => {
                for matched in matches {
                    let mut combined = row.clone();
                    for (name, value) in matched.iter() {
                        if name != key && !combined.contains(name) {
                            combined.push(name, value.clone());
                        }
                    }
                    joined.push(combined);
                }
            }
            None => {
                let mut padded = row.clone();
                for name in &right_columns {
                    if !padded.contains(name) {
                        padded.push(*name, Value::Null);
                    }
                }
                joined.push(padded);
            }
        }
    }

    joined
}
