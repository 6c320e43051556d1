//! Domain identifier types with validation
//!
//! Business keys arrive from three stores and from query strings, sometimes
//! as JSON numbers and sometimes as strings. Every identifier is compared by
//! its normalized string form so that `5` and `"5"` name the same student.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Normalize a raw key value to its canonical string form
///
/// - strings are trimmed
/// - integral numbers print without a fractional part (`5.0` → `"5"`)
/// - `null`, empty strings, booleans, arrays and objects yield `None`
///
/// # Examples
///
/// ```
/// use classroll::domain::ids::normalize_key;
/// use serde_json::json;
///
/// assert_eq!(normalize_key(&json!(5)), Some("5".to_string()));
/// assert_eq!(normalize_key(&json!(" 5 ")), Some("5".to_string()));
/// assert_eq!(normalize_key(&json!(null)), None);
/// ```
pub fn normalize_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                let f = n.as_f64()?;
                // Integral floats beyond i64 keep their own digits
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Some(format!("{}", f as i64))
                } else {
                    Some(f.to_string())
                }
            }
        }
        _ => None,
    }
}

macro_rules! business_key {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a new ", $label, " from a string")]
            ///
            /// Surrounding whitespace is removed; an empty key is rejected.
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                let trimmed = id.trim();
                if trimmed.is_empty() {
                    return Err(format!("{} cannot be empty", $label));
                }
                Ok(Self(trimmed.to_string()))
            }

            #[doc = concat!("Builds a ", $label, " from a raw row value, if it carries a usable key")]
            pub fn from_value(value: &Value) -> Option<Self> {
                normalize_key(value).map(Self)
            }

            /// Returns the key as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

business_key!(
    /// Registrar business key for a student
    ///
    /// Distinct from any internal numeric row id the registrar store uses.
    StudentId,
    "Student ID"
);

business_key!(
    /// Teacher-store key for a class section
    ClassId,
    "Class ID"
);

business_key!(
    /// Login-store key for a teacher account
    TeacherId,
    "Teacher ID"
);
