//! TabMate engine: page fetching, text generation and the classify pipeline.
mod classify;
mod decode;
mod extract;
mod fetch;
mod json_scan;
mod llm;
mod pipeline;
mod pool;
mod prompt;
mod translate;
mod types;

pub use classify::{ClassifyError, Classifier};
pub use decode::{decode_html, DecodedHtml};
pub use extract::{Extractor, PageSummary, ParagraphExtractor, DEFAULT_SNIPPET_CHARS};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, BROWSER_USER_AGENT};
pub use json_scan::first_json_object;
pub use llm::{
    GenerationError, GenerationRequest, LlmSettings, OpenAiChatClient, ResponseFormat,
    TextGenerator, DEFAULT_BASE_URL,
};
pub use pipeline::Pipeline;
pub use pool::{WorkerPool, DEFAULT_WORKERS};
pub use prompt::{classification_prompt, FILTER_SYSTEM_PROMPT};
pub use translate::{parse_filter_reply, CommandTranslator, TranslateError};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput};
