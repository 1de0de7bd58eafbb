use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use tabmate_engine::{
    CommandTranslator, FetchError, GenerationError, OpenAiChatClient, ParagraphExtractor,
    Pipeline, ReqwestFetcher, TextGenerator,
};
use tokio::runtime::Handle;

use crate::AppConfig;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to build page fetcher: {0}")]
    Fetcher(#[from] FetchError),
    #[error("failed to build text generation client: {0}")]
    Generator(#[from] GenerationError),
}

/// Shared, read-only service handles for the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub translator: Arc<CommandTranslator>,
    pub max_workers: usize,
}

impl AppState {
    pub fn new(
        pipeline: Arc<Pipeline>,
        translator: Arc<CommandTranslator>,
        max_workers: usize,
    ) -> Self {
        Self {
            pipeline,
            translator,
            max_workers,
        }
    }

    /// Builds every collaborator once, at process start.
    pub fn from_config(config: &AppConfig, runtime: Handle) -> Result<Self, StartupError> {
        let llm_settings = config.llm.to_settings(|name| std::env::var(name).ok());
        if llm_settings.api_key.is_none() {
            engine_warn!(
                "Environment variable {} is not set; classification requests will fail",
                config.llm.api_key_env
            );
        }
        let generator: Arc<dyn TextGenerator> = Arc::new(OpenAiChatClient::new(llm_settings)?);
        let fetcher = Arc::new(ReqwestFetcher::new(config.fetch.to_settings())?);
        let extractor = Arc::new(ParagraphExtractor::new(config.fetch.snippet_chars));

        engine_info!(
            "Pipeline ready: max_workers={}, snippet_chars={}",
            config.fetch.max_workers,
            config.fetch.snippet_chars
        );

        Ok(Self::new(
            Arc::new(Pipeline::new(fetcher, extractor, generator.clone(), runtime)),
            Arc::new(CommandTranslator::new(generator)),
            config.fetch.max_workers,
        ))
    }
}
