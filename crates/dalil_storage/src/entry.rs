//! Persisted list entries and their storage encoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::StorageError;

/// One id in a persisted list, with the time it was added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,
}

impl ListEntry {
    pub fn new(id: impl Into<String>, added_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            added_at,
        }
    }

    /// Entry stamped with the current time.
    pub fn now(id: impl Into<String>) -> Self {
        Self::new(id, Utc::now())
    }
}

/// Accepted shapes of one stored element. Older writers stored bare ids.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Entry(ListEntry),
    Bare(String),
}

impl From<StoredEntry> for ListEntry {
    fn from(stored: StoredEntry) -> Self {
        match stored {
            StoredEntry::Entry(entry) => entry,
            StoredEntry::Bare(id) => ListEntry::new(id, DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

/// Parses a stored list. Anything but a JSON array of entries or ids is an error.
pub(crate) fn decode(raw: &str) -> Result<Vec<ListEntry>, serde_json::Error> {
    let stored: Vec<StoredEntry> = serde_json::from_str(raw)?;
    Ok(stored.into_iter().map(ListEntry::from).collect())
}

pub(crate) fn encode(entries: &[ListEntry]) -> Result<String, StorageError> {
    serde_json::to_string(entries).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn encodes_camel_case_millis() {
        let json = encode(&[ListEntry::new("42", at(1_700_000_000_123))]).unwrap();
        assert_eq!(json, r#"[{"id":"42","addedAt":1700000000123}]"#);
    }

    #[test]
    fn decodes_entries() {
        let entries = decode(r#"[{"id":"a","addedAt":5},{"id":"b","addedAt":3}]"#).unwrap();
        assert_eq!(
            entries,
            vec![ListEntry::new("a", at(5)), ListEntry::new("b", at(3))]
        );
    }

    #[test]
    fn decodes_legacy_bare_ids_at_epoch() {
        let entries = decode(r#"["a", {"id":"b","addedAt":3}]"#).unwrap();
        assert_eq!(
            entries,
            vec![ListEntry::new("a", at(0)), ListEntry::new("b", at(3))]
        );
    }

    #[rstest]
    #[case::not_json("{oops")]
    #[case::object(r#"{"id":"a"}"#)]
    #[case::number("42")]
    #[case::null("null")]
    #[case::wrong_element(r#"[1, 2]"#)]
    #[case::missing_id(r#"[{"addedAt": 1}]"#)]
    fn rejects_other_shapes(#[case] raw: &str) {
        assert!(decode(raw).is_err(), "Expected error for {raw}");
    }
}
