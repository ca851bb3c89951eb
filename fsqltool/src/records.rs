//! Order-preserving result records.
//!
//! ```rust
//! use fsqltool::{ResultRecord, ResultSet};
//! use fsource::SqlValue;
//!
//! let mut record = ResultRecord::new();
//! record.push("id", SqlValue::Integer(5));
//! record.push("name", SqlValue::Null);
//!
//! let set = ResultSet::from(vec![record]);
//! assert_eq!(set.to_json_string().expect("json"), r#"[{"id":5,"name":null}]"#);
//! ```

use serde::Serialize;
use serde::ser::Serializer;

use fsource::SqlValue;

/// One row as (column, value) pairs in result-set column order.
///
/// Duplicate column names are kept positionally; [`ResultRecord::get`]
/// returns the first match.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultRecord {
    entries: Vec<(String, SqlValue)>,
}

impl ResultRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, value: SqlValue) {
        self.entries.push((column.into(), value));
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&SqlValue> {
        self.entries.iter().map(|(_, value)| value).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for ResultRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.entries.iter().map(|(name, value)| (name, value)))
    }
}

/// Every record of one invocation. Empty when no rows matched.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: Vec<ResultRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<ResultRecord> {
        self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Vec<ResultRecord>> for ResultSet {
    fn from(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }
}
