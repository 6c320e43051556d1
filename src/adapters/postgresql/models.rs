//! Conversions between driver types and source rows

use crate::adapters::source::{QueryParam, Row};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use tokio_postgres::types::{ToSql, Type};

/// Boxed parameter that can cross an await point
pub type BoxedParam = Box<dyn ToSql + Sync + Send>;

/// Convert a query parameter to its driver representation
pub fn to_sql_param(param: &QueryParam) -> BoxedParam {
    match param {
        QueryParam::Text(s) => Box::new(s.clone()),
        QueryParam::OptText(s) => Box::new(s.clone()),
        QueryParam::TextList(items) => Box::new(items.clone()),
        QueryParam::Int(i) => Box::new(*i),
        QueryParam::Date(d) => Box::new(*d),
    }
}

/// Convert a driver row into a [`Row`], keeping column order
///
/// Dates become `YYYY-MM-DD`, timestamps ISO text, and column types with
/// no JSON mapping (for example `numeric` without a cast) become null.
pub fn to_row(row: &tokio_postgres::Row) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            (
                column.name().to_string(),
                column_value(row, idx, column.type_()),
            )
        })
        .collect()
}

fn column_value(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Value {
    let value = match *ty {
        Type::BOOL => row.try_get::<_, Option<bool>>(idx).map(|v| v.map(Value::from)),
        Type::INT2 => row
            .try_get::<_, Option<i16>>(idx)
            .map(|v| v.map(|i| Value::from(i64::from(i)))),
        Type::INT4 => row
            .try_get::<_, Option<i32>>(idx)
            .map(|v| v.map(|i| Value::from(i64::from(i)))),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx).map(|v| v.map(Value::from)),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)
            .map(|v| v.map(|f| Value::from(f64::from(f)))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx).map(|v| v.map(Value::from)),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(idx)
            .map(|v| v.map(|d| Value::from(d.format("%Y-%m-%d").to_string()))),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)
            .map(|v| v.map(|t| Value::from(t.format("%Y-%m-%d %H:%M:%S").to_string()))),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<DateTime<Utc>>>(idx)
            .map(|v| v.map(|t| Value::from(t.to_rfc3339()))),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(idx),
        _ => row.try_get::<_, Option<String>>(idx).map(|v| v.map(Value::from)),
    };

    match value {
        Ok(Some(v)) => v,
        Ok(None) => Value::Null,
        Err(e) => {
            tracing::debug!(column = idx, type_name = %ty, error = %e, "Unmapped column type");
            Value::Null
        }
    }
}
