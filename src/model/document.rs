//! Remote documents as returned by the syndication API.
//!
//! A [`Document`] keeps `attributes` and `links` as untyped JSON objects: the
//! remote schema varies by profile (story, image, group, ...) and the bridge
//! only ever copies or filters them. Related documents stay raw in `items`
//! until a caller asks for them with [`Document::related`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Link relations that must never be sent to a client.
pub const RESERVED_LINK_RELATIONS: [&str; 2] = ["auth", "query"];

/// A single remote document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Value>,
}

impl Document {
    /// Creates a document from an attribute map, with no links or items.
    pub fn with_attributes(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Parses a document out of a raw JSON value.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Document::deserialize(value)
    }

    /// The document's globally unique id, if it carries one.
    pub fn guid(&self) -> Option<&str> {
        self.attribute_str("guid")
    }

    /// Convenience accessor for string attributes.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Parses the raw `items` into documents, in server order.
    pub fn related(&self) -> Result<Vec<Document>, serde_json::Error> {
        self.items.iter().map(Document::from_value).collect()
    }

    /// The `links` object with reserved relations removed.
    pub fn client_links(&self) -> Map<String, Value> {
        strip_reserved_links(&self.links)
    }
}

/// Copies a `links` object, dropping the `auth` and `query` relations.
pub fn strip_reserved_links(links: &Map<String, Value>) -> Map<String, Value> {
    links
        .iter()
        .filter(|(rel, _)| !RESERVED_LINK_RELATIONS.contains(&rel.as_str()))
        .map(|(rel, link)| (rel.clone(), link.clone()))
        .collect()
}

// The API sends `null` for empty collections as often as it omits them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
