use std::collections::hash_map;
use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{Record, RecordId};

/// One decoded page of a search response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Total number of matching records across all pages, as reported on
    /// page 1. `None` when the field is absent or not a JSON integer.
    #[serde(
        default,
        deserialize_with = "integer_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub size: Option<i64>,
    /// Records on this page, in backend order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<Record>,
    /// Any other top-level fields, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn integer_or_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_i64))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Record>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Records from every page of a search, keyed by `id`.
///
/// Inserting a record whose id is already present replaces the earlier
/// record. Records without a usable id are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregatedResult {
    records: HashMap<RecordId, Record>,
}

impl AggregatedResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a record by id. Returns `false` if the record
    /// has no usable id and was skipped.
    pub fn insert(&mut self, record: Record) -> bool {
        match RecordId::of(&record) {
            Some(id) => {
                self.records.insert(id, record);
                true
            }
            None => {
                tracing::warn!("Skipping record without a usable id: {:?}", record.get("id"));
                false
            }
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.records.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, RecordId, Record> {
        self.records.iter()
    }

    pub fn into_inner(self) -> HashMap<RecordId, Record> {
        self.records
    }
}

impl FromIterator<Record> for AggregatedResult {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut result = AggregatedResult::new();
        for record in iter {
            result.insert(record);
        }
        result
    }
}

impl IntoIterator for AggregatedResult {
    type Item = (RecordId, Record);
    type IntoIter = hash_map::IntoIter<RecordId, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn size_must_be_an_integer() {
        let page: PageResponse = serde_json::from_value(json!({"size": 30, "results": []})).unwrap();
        assert_eq!(page.size, Some(30));

        let page: PageResponse = serde_json::from_value(json!({"size": "30"})).unwrap();
        assert_eq!(page.size, None);

        let page: PageResponse = serde_json::from_value(json!({"size": 30.0})).unwrap();
        assert_eq!(page.size, None);

        let page: PageResponse = serde_json::from_value(json!({"results": null})).unwrap();
        assert_eq!(page.size, None);
        assert!(page.results.is_empty());
    }

    #[test]
    fn extra_fields_are_kept() {
        let page: PageResponse =
            serde_json::from_value(json!({"size": 1, "results": [{"id": 1}], "page": 1})).unwrap();
        assert_eq!(page.extra.get("page"), Some(&json!(1)));
        assert_eq!(page.results.len(), 1);
    }

    #[test]
    fn later_record_wins() {
        let result: AggregatedResult = vec![
            record(json!({"id": 1, "name": "first"})),
            record(json!({"id": 1, "name": "second"})),
        ]
        .into_iter()
        .collect();
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get(&RecordId::Int(1)).unwrap()["name"],
            json!("second")
        );
    }

    #[test]
    fn records_without_id_are_skipped() {
        let mut result = AggregatedResult::new();
        assert!(!result.insert(record(json!({"name": "orphan"}))));
        assert!(result.insert(record(json!({"id": "abc"}))));
        assert_eq!(result.len(), 1);
        assert!(result.contains(&RecordId::from("abc")));
    }

    #[test]
    fn serializes_as_id_keyed_object() {
        let result: AggregatedResult = vec![record(json!({"id": 5, "name": "x"}))]
            .into_iter()
            .collect();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"5": {"id": 5, "name": "x"}}));
    }
}
