use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One browser tab as exchanged with the front-end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub title: String,
    pub url: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Front-end keys this service does not interpret (`isActive`, ...),
    /// carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TabRecord {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            category: category.into(),
            favicon: None,
            extra: Map::new(),
        }
    }

    pub fn with_favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }
}

/// Browser tab ids are integers; the front-end may send them unconverted.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
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
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::TabRecord;

    #[test]
    fn numeric_id_is_read_as_string() {
        let record: TabRecord = serde_json::from_str(
            r#"{"id": 42, "title": "t", "url": "https://a.example", "category": "Other", "isActive": true}"#,
        )
        .unwrap();
        assert_eq!(record.id, "42");
        assert_eq!(record.favicon, None);
        assert_eq!(record.extra.get("isActive"), Some(&serde_json::Value::Bool(true)));
    }

    #[test]
    fn unknown_keys_survive_a_round_trip() {
        let raw = serde_json::json!({
            "id": "1", "title": "t", "url": "https://a.example", "category": "News/Articles",
            "favicon": "f", "isActive": true, "isDuplicate": false, "isDistraction": true
        });
        let record: TabRecord = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), raw);
    }
}
