use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::TabRecord;

/// Record fields a rule may constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Id,
    Title,
    Url,
    Category,
}

impl FilterField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(FilterField::Id),
            "title" => Some(FilterField::Title),
            "url" => Some(FilterField::Url),
            "category" => Some(FilterField::Category),
            _ => None,
        }
    }

    pub fn value_of(self, record: &TabRecord) -> &str {
        match self {
            FilterField::Id => &record.id,
            FilterField::Title => &record.title,
            FilterField::Url => &record.url,
            FilterField::Category => &record.category,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FilterRuleError {
    #[error("filter rule is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Include/exclude predicate over tab records.
///
/// Each side is a map of `field -> value`. All include pairs must match and
/// no exclude pair may match. Unknown fields and non-string values are kept
/// as-is and simply never equal a record field.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Map<String, Value>>,
}

impl FilterRule {
    pub fn from_json_str(raw: &str) -> Result<Self, FilterRuleError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_value(value: Value) -> Result<Self, FilterRuleError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn include(mut self, field: &str, value: impl Into<String>) -> Self {
        self.include
            .get_or_insert_with(Map::new)
            .insert(field.to_string(), Value::String(value.into()));
        self
    }

    pub fn exclude(mut self, field: &str, value: impl Into<String>) -> Self {
        self.exclude
            .get_or_insert_with(Map::new)
            .insert(field.to_string(), Value::String(value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.include.as_ref().map_or(true, Map::is_empty)
            && self.exclude.as_ref().map_or(true, Map::is_empty)
    }

    pub fn matches(&self, record: &TabRecord) -> bool {
        let mut included = true;
        if let Some(include) = &self.include {
            included = include
                .iter()
                .all(|(field, value)| field_equals(record, field, value));
        }
        if included {
            if let Some(exclude) = &self.exclude {
                included = exclude
                    .iter()
                    .all(|(field, value)| !field_equals(record, field, value));
            }
        }
        included
    }
}

/// Returns the records that satisfy `rule`, in their original order.
pub fn apply(records: &[TabRecord], rule: &FilterRule) -> Vec<TabRecord> {
    records
        .iter()
        .filter(|record| rule.matches(record))
        .cloned()
        .collect()
}

fn field_equals(record: &TabRecord, field: &str, value: &Value) -> bool {
    match (FilterField::parse(field), value) {
        (Some(field), Value::String(expected)) => field.value_of(record) == expected,
        _ => false,
    }
}
