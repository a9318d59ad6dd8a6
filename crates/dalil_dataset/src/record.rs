//! Tool records as published in the dataset file.

use serde::{Deserialize, Deserializer, Serialize};

/// One AI tool entry from the published dataset.
///
/// Only the fields the directory itself reads are typed; everything else is
/// kept verbatim in `extra` so records survive a round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRecord {
    /// Identifier, normalized to a string (the source emits both numbers and strings).
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub pricing_type: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_published")]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviews_count: Option<u64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_published() -> bool {
    true
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// Resolves `ids` against `records`, preserving the order of `ids` and
/// skipping ids that are not in the dataset.
pub fn find_by_ids<'a>(records: &'a [ToolRecord], ids: &[String]) -> Vec<&'a ToolRecord> {
    ids.iter()
        .filter_map(|id| records.iter().find(|r| &r.id == id))
        .collect()
}
