// src/content/attributes.rs
// Columnar attribute table built from per-feature attribute maps
// RELEVANT FILES: src/content/record.rs, src/content/encoder.rs

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::error::{ContentError, ContentResult};
use super::record::GeometryRecord;

/// How to treat a record that lacks a key some other record has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingAttributePolicy {
    /// Append on presence only. Columns may end up shorter than the record
    /// count and lose alignment with record indices.
    #[default]
    Skip,
    /// Fill gaps with `null` so every column has one slot per record
    Pad,
    /// Fail on the first record missing a known key
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationOptions {
    pub missing: MissingAttributePolicy,
}

/// Values of one attribute across records
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeColumn {
    pub name: String,
    pub values: Vec<Value>,
}

/// Attribute name to value sequence, columns in first-seen order across
/// records and in insertion order within a record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeTable {
    columns: Vec<AttributeColumn>,
    index: HashMap<String, usize>,
}

impl AttributeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[Value]> {
        self.index.get(name).map(|&i| self.columns[i].values.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn columns(&self) -> &[AttributeColumn] {
        &self.columns
    }

    /// Columns whose length differs from `rows`
    pub fn ragged_columns(&self, rows: usize) -> Vec<&AttributeColumn> {
        self.columns.iter().filter(|c| c.values.len() != rows).collect()
    }

    /// Column for `name`, created with `prefill` nulls on first sight
    fn column_mut(&mut self, name: &str, prefill: usize) -> &mut AttributeColumn {
        let i = match self.index.get(name).copied() {
            Some(i) => i,
            None => {
                self.columns.push(AttributeColumn {
                    name: name.to_string(),
                    values: vec![Value::Null; prefill],
                });
                self.index.insert(name.to_string(), self.columns.len() - 1);
                self.columns.len() - 1
            }
        };
        &mut self.columns[i]
    }

    /// JSON object `{ name: [values...] }`
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.columns
                .iter()
                .map(|c| (c.name.clone(), Value::Array(c.values.clone())))
                .collect(),
        )
    }
}

impl Serialize for AttributeTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for c in &self.columns {
            map.serialize_entry(&c.name, &c.values)?;
        }
        map.end()
    }
}

/// Merge record attributes into columns, iterating records in order.
pub fn aggregate_attributes<G>(
    records: &[GeometryRecord<G>],
    options: &AggregationOptions,
) -> ContentResult<AttributeTable> {
    let mut table = AttributeTable::new();

    match options.missing {
        MissingAttributePolicy::Skip => {
            for record in records {
                for (name, value) in &record.attributes {
                    table.column_mut(name, 0).values.push(value.clone());
                }
            }
            let ragged = table.ragged_columns(records.len());
            if !ragged.is_empty() {
                log::warn!(
                    "{} of {} attribute columns do not cover all {} records: {}",
                    ragged.len(),
                    table.len(),
                    records.len(),
                    ragged.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
                );
            }
        }
        MissingAttributePolicy::Pad => {
            for (row, record) in records.iter().enumerate() {
                for (name, value) in &record.attributes {
                    table.column_mut(name, row).values.push(value.clone());
                }
                for column in &mut table.columns {
                    if column.values.len() == row {
                        column.values.push(Value::Null);
                    }
                }
            }
        }
        MissingAttributePolicy::Reject => {
            let mut keys: Vec<&str> = Vec::new();
            for record in records {
                for name in record.attributes.keys() {
                    if !keys.contains(&name.as_str()) {
                        keys.push(name.as_str());
                    }
                }
            }
            for record in records {
                if let Some(name) = keys.iter().find(|k| !record.attributes.contains_key(**k)) {
                    return Err(ContentError::MissingAttribute {
                        name: name.to_string(),
                        batch_id: record.batch_id,
                    });
                }
                for (name, value) in &record.attributes {
                    table.column_mut(name, 0).values.push(value.clone());
                }
            }
        }
    }

    Ok(table)
}
