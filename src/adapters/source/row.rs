//! Ordered rows and query descriptions
//!
//! A [`Row`] is an ordered field-name → value mapping exactly as a store
//! returned it. Values are [`serde_json::Value`] so the same row type flows
//! from PostgreSQL, from the in-memory source and from JSON fixtures.

use crate::domain::ids::normalize_key;
use crate::domain::Store;
use chrono::{NaiveDate, NaiveDateTime};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// One result row, fields in store order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field append
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(name, value);
        self
    }

    /// Set a field, replacing an existing value of the same name in place
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True when the field is absent or SQL NULL
    pub fn is_null(&self, name: &str) -> bool {
        matches!(self.get(name), None | Some(Value::Null))
    }

    /// Normalized business key (see [`normalize_key`])
    pub fn get_key(&self, name: &str) -> Option<String> {
        self.get(name).and_then(normalize_key)
    }

    /// Text value; numbers and booleans are rendered, null gives `None`
    pub fn get_str(&self, name: &str) -> Option<String> {
        match self.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            other => Some(other.to_string()),
        }
    }

    /// First non-null text among several candidate columns
    pub fn get_str_any(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.get_str(n))
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Calendar date from `YYYY-MM-DD` or the date prefix of a timestamp
    pub fn get_date(&self, name: &str) -> Option<NaiveDate> {
        let raw = self.get_str(name)?;
        let raw = raw.trim();
        let prefix = raw.get(..10).unwrap_or(raw);
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }

    /// Timestamp from `YYYY-MM-DD HH:MM:SS`, ISO `T` form, or RFC 3339
    pub fn get_datetime(&self, name: &str) -> Option<NaiveDateTime> {
        let raw = self.get_str(name)?;
        let raw = raw.trim();
        if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    }

    /// Build a row from a JSON object, keeping key order as parsed
    pub fn from_json(value: &Value) -> Option<Self> {
        value.as_object().map(|obj| {
            obj.iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Row>()
        })
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (name, value) in iter {
            row.push(name, value);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Typed query parameter
#[derive(Debug, Clone, PartialEq)]
pub enum QueryParam {
    Text(String),
    OptText(Option<String>),
    TextList(Vec<String>),
    Int(i64),
    Date(NaiveDate),
}

impl QueryParam {
    /// Plain-text form, used for logging and for in-memory matching
    pub fn display(&self) -> String {
        match self {
            QueryParam::Text(s) => s.clone(),
            QueryParam::OptText(Some(s)) => s.clone(),
            QueryParam::OptText(None) => "NULL".to_string(),
            QueryParam::TextList(items) => format!("[{}]", items.join(",")),
            QueryParam::Int(i) => i.to_string(),
            QueryParam::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

/// A named, parameterized query against one logical store
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Stable name, used in logs and by the in-memory source
    pub name: &'static str,
    pub store: Store,
    pub sql: &'static str,
    pub params: Vec<QueryParam>,
}

impl Query {
    pub fn new(name: &'static str, store: Store, sql: &'static str) -> Self {
        Self {
            name,
            store,
            sql,
            params: Vec::new(),
        }
    }

    pub fn bind(mut self, param: QueryParam) -> Self {
        self.params.push(param);
        self
    }
}
