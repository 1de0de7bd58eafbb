use std::sync::Arc;

use serde::Deserialize;
use tabmate_core::{Category, TabRecord};
use uuid::Uuid;

use crate::json_scan::first_json_object;
use crate::prompt::classification_prompt;
use crate::{GenerationError, GenerationRequest, PageSummary, TextGenerator};

const MAX_REPLY_EXCERPT: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("classification reply is not a JSON object: {reply}")]
    InvalidFormat { reply: String },
}

/// The object the model is asked for. Every key is optional because the
/// model is not trusted to follow the schema.
#[derive(Debug, Deserialize)]
struct ModelClassification {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

pub struct Classifier {
    generator: Arc<dyn TextGenerator>,
}

impl Classifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Classifies one page into a tab record.
    ///
    /// The record always gets a fresh UUID and the caller's URL; the model
    /// only contributes the title and the category.
    pub async fn classify(&self, url: &str, page: &PageSummary) -> Result<TabRecord, ClassifyError> {
        let request = GenerationRequest::json(classification_prompt(url, page));
        let reply = self.generator.generate(request).await?;
        let parsed = parse_reply(&reply)?;

        let title = parsed
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| page.title.clone());
        let category = Category::from_model_output(parsed.category.as_deref().unwrap_or_default());

        let mut record = TabRecord::new(Uuid::new_v4().to_string(), title, url, category.label());
        record.favicon = page.favicon.clone();
        Ok(record)
    }
}

fn parse_reply(reply: &str) -> Result<ModelClassification, ClassifyError> {
    let invalid = || ClassifyError::InvalidFormat {
        reply: reply.chars().take(MAX_REPLY_EXCERPT).collect(),
    };
    let object = first_json_object(reply).ok_or_else(invalid)?;
    serde_json::from_str(object).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_with_fences_is_accepted() {
        let parsed = parse_reply("```json\n{\"title\": \"X\", \"category\": \"Other\"}\n```").unwrap();
        assert_eq!(parsed.title.as_deref(), Some("X"));
        assert_eq!(parsed.category.as_deref(), Some("Other"));
    }

    #[test]
    fn array_reply_is_rejected() {
        let err = parse_reply("[\"Other\"]").unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidFormat { .. }));
    }

    #[test]
    fn wrongly_typed_fields_are_rejected() {
        let err = parse_reply("{\"title\": 3}").unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidFormat { .. }));
    }
}
