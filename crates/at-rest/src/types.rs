//! Record types shared by the query and upsert engines.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A record as returned by the service.
///
/// Decoding is lenient: an unparseable `createdTime` becomes `None` and a
/// null `fields` becomes an empty map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "createdTime",
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Get a field value by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Decode the elements of a `records` array.
    ///
    /// Elements that are not record objects are skipped; the second value
    /// is how many were skipped.
    pub fn decode_all(items: &[Value]) -> (Vec<Record>, usize) {
        let mut skipped = 0;
        let records = items
            .iter()
            .filter_map(|item| {
                let record = Record::deserialize(item).ok();
                if record.is_none() {
                    skipped += 1;
                }
                record
            })
            .collect();
        (records, skipped)
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|ts| ts.with_timezone(&Utc)))
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A record to create or update.
///
/// A non-empty `id` addresses an existing record (update). Without an id,
/// `fields` describes a new record (create). Entries with neither are
/// skipped by [`upsert`](crate::AirtableRestClient::upsert).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpsertRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
}

impl UpsertRecord {
    /// An update of the record with the given id.
    pub fn update(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: Some(id.into()),
            fields: Some(fields),
        }
    }

    /// A new record.
    pub fn create(fields: Map<String, Value>) -> Self {
        Self {
            id: None,
            fields: Some(fields),
        }
    }

    /// The id, if it is non-empty.
    pub fn target_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}
