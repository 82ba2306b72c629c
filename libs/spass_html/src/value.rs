//! The data shown by listings: field values, rows and the content as
//! a whole.

use std::{fmt, sync::Arc};

use anyhow::{Result, bail};
use kstring::KString;

use crate::{alist::AList, error::DataShapeError, myfrom::MyFrom};

/// A field value. Compared and displayed via its string form.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(KString),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl Value {
    pub fn to_kstring(&self) -> KString {
        match self {
            Value::Text(s) => s.clone(),
            _ => KString::from_string(self.to_string()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::Text(KString::from_ref(s)) }
}
impl From<String> for Value {
    fn from(s: String) -> Self { Value::Text(KString::from_string(s)) }
}
impl From<KString> for Value {
    fn from(s: KString) -> Self { Value::Text(s) }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self { Value::Int(i) }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self { Value::Int(i.into()) }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self { Value::Float(x) }
}
impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<&serde_json::Value> for Value {
    fn from(v: &serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => Value::Null,
            J::Bool(b) => Value::Bool(*b),
            J::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(x) = n.as_f64() {
                    Value::Float(x)
                } else {
                    Value::Text(KString::from_string(n.to_string()))
                }
            }
            J::String(s) => Value::Text(KString::from_ref(s)),
            // Nested structures are shown in their JSON form.
            J::Array(_) | J::Object(_) => Value::Text(KString::from_string(v.to_string())),
        }
    }
}

impl MyFrom<&Value> for KString {
    fn myfrom(v: &Value) -> Self {
        v.to_kstring()
    }
}


/// One record of a listing.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Named fields in their natural order.
    Map(AList<KString, Value>),
    /// Positional values with a column list shared between rows.
    Sequence { columns: Arc<[KString]>, values: Vec<Value> },
    /// Positional values without column names; fields can only be
    /// found by position ("0", "1", ..).
    Values(Vec<Value>),
}

impl Row {
    /// The column names, if the row has any.
    pub fn keys(&self) -> Option<Vec<KString>> {
        match self {
            Row::Map(m) => Some(m.keys().cloned().collect()),
            Row::Sequence { columns, .. } => Some(columns.to_vec()),
            Row::Values(_) => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        match self {
            Row::Map(m) => m.contains_key(key),
            Row::Sequence { columns, .. } => columns.iter().any(|c| c == key),
            Row::Values(_) => false,
        }
    }

    /// Field `key` by name, or failing that by position.
    pub fn get(&self, key: &str) -> Option<&Value> {
        fn by_position<'v>(key: &str, values: &'v [Value]) -> Option<&'v Value> {
            key.parse::<usize>().ok().and_then(|i| values.get(i))
        }
        match self {
            Row::Map(m) => m.get(key),
            Row::Sequence { columns, values } => {
                match columns.iter().position(|c| c == key) {
                    Some(i) => values.get(i),
                    None => by_position(key, values),
                }
            }
            Row::Values(values) => by_position(key, values),
        }
    }

    /// The string form of field `key`, empty if missing.
    pub fn get_str(&self, key: &str) -> KString {
        self.get(key).map(Value::to_kstring).unwrap_or_else(|| KString::from_static(""))
    }

    /// Replace the value of the existing field `key` (found the same
    /// way as `get` does); false if there is no such field.
    pub fn set(&mut self, key: &str, value: Value) -> bool {
        fn by_position<'v>(key: &str, values: &'v mut [Value]) -> Option<&'v mut Value> {
            key.parse::<usize>().ok().and_then(move |i| values.get_mut(i))
        }
        let slot = match self {
            Row::Map(m) => m.get_mut(key),
            Row::Sequence { columns, values } => {
                match columns.iter().position(|c| c == key) {
                    Some(i) => values.get_mut(i),
                    None => by_position(key, values),
                }
            }
            Row::Values(values) => by_position(key, values),
        };
        match slot {
            Some(v) => {
                *v = value;
                true
            }
            None => false
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where KString: MyFrom<K>, V: Into<Value>
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row::Map(iter.into_iter().map(|(k, v)| (KString::myfrom(k), v.into())).collect())
    }
}

/// Build a `Row::Map`: `row!{"id" => 1, "name" => "Jo"}`.
#[macro_export]
macro_rules! row {
    { $($k:expr => $v:expr),* $(,)? } => {
        $crate::value::Row::Map(
            [$(($crate::myfrom::ks($k), $crate::value::Value::from($v))),*]
                .into_iter().collect())
    }
}


/// What a listing shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Rows(Vec<Row>),
    /// A single record, shown as key/value pairs.
    Record(AList<KString, Value>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Rows(Vec::new())
    }
}

impl From<Vec<Row>> for Content {
    fn from(rows: Vec<Row>) -> Self {
        Content::Rows(rows)
    }
}

impl Content {
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Rows(rows) => rows.is_empty(),
            Content::Record(r) => r.is_empty(),
        }
    }

    /// Rows with shared column names from a header and positional
    /// values.
    pub fn from_columns<T>(columns: impl IntoIterator<Item = T>, rows: Vec<Vec<Value>>) -> Self
    where KString: MyFrom<T>
    {
        let columns: Arc<[KString]> = columns.into_iter().map(KString::myfrom).collect();
        Content::Rows(rows.into_iter()
                      .map(|values| Row::Sequence { columns: columns.clone(), values })
                      .collect())
    }

    /// An array of objects gives rows, a single object a record. Key
    /// order is kept.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let v: serde_json::Value = serde_json::from_str(s)
            .map_err(|e| DataShapeError::Json(e.to_string()))?;
        Self::from_json(&v)
    }

    pub fn from_json(v: &serde_json::Value) -> Result<Self> {
        use serde_json::Value as J;
        let record = |m: &serde_json::Map<String, J>| -> AList<KString, Value> {
            m.iter().map(|(k, v)| (KString::from_ref(k), Value::from(v))).collect()
        };
        match v {
            J::Array(items) => {
                let rows = items.iter().map(|item| match item {
                    J::Object(m) => Row::Map(record(m)),
                    J::Array(vals) => Row::Values(vals.iter().map(Value::from).collect()),
                    other => Row::Values(vec![Value::from(other)]),
                }).collect();
                Ok(Content::Rows(rows))
            }
            J::Object(m) => Ok(Content::Record(record(m))),
            J::Null => Ok(Content::default()),
            _ => bail!(DataShapeError::Json(
                "expecting an array of rows or an object".into())),
        }
    }
}
