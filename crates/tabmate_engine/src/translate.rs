use std::sync::Arc;

use engine_logging::{engine_debug, engine_warn};
use tabmate_core::FilterRule;

use crate::json_scan::first_json_object;
use crate::prompt::FILTER_SYSTEM_PROMPT;
use crate::{GenerationError, GenerationRequest, TextGenerator};

const MAX_REPLY_EXCERPT: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("invalid filter format: {reply}")]
    InvalidFilterFormat { reply: String },
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Turns a free-text command into a filter rule with one generation call.
pub struct CommandTranslator {
    generator: Arc<dyn TextGenerator>,
}

impl CommandTranslator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn translate(&self, command: &str) -> Result<FilterRule, TranslateError> {
        let request = GenerationRequest::json(command).with_system(FILTER_SYSTEM_PROMPT);
        let reply = self.generator.generate(request).await?;
        engine_debug!("Filter reply for {:?}: {}", command, reply);
        parse_filter_reply(&reply)
    }
}

/// Reads the first JSON object in `reply` as a filter rule. No retry.
pub fn parse_filter_reply(reply: &str) -> Result<FilterRule, TranslateError> {
    let invalid = || TranslateError::InvalidFilterFormat {
        reply: reply.chars().take(MAX_REPLY_EXCERPT).collect(),
    };
    let object = first_json_object(reply).ok_or_else(invalid)?;
    FilterRule::from_json_str(object).map_err(|err| {
        engine_warn!("Rejected filter reply: {}", err);
        invalid()
    })
}
