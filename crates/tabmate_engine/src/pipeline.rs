use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use engine_logging::{engine_debug, engine_info, engine_warn};
use tabmate_core::FetchResult;
use tokio::runtime::Handle;

use crate::{decode_html, Classifier, Extractor, Fetcher, TextGenerator, WorkerPool};

/// Fetch-and-classify pipeline.
///
/// Collaborators are injected once and shared read-only. `process` blocks
/// the calling thread, so async callers should hand it to
/// `tokio::task::spawn_blocking`.
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    classifier: Classifier,
    runtime: Handle,
}

impl Pipeline {
    /// `runtime` drives the async IO of every unit; it must outlive the pipeline.
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        generator: Arc<dyn TextGenerator>,
        runtime: Handle,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            classifier: Classifier::new(generator),
            runtime,
        }
    }

    /// Fetches and classifies every URL on at most `max_workers` threads.
    ///
    /// Returns one result per input URL in completion order. Failures are
    /// reported as error records, never as a panic or an early return.
    pub fn process(&self, urls: &[String], max_workers: usize) -> Vec<FetchResult> {
        if urls.is_empty() {
            return Vec::new();
        }
        let pool = WorkerPool::new(max_workers);
        engine_info!(
            "Processing {} urls on {} workers",
            urls.len(),
            pool.workers().min(urls.len())
        );

        let results = pool.run(urls.iter(), |url| {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                self.runtime.block_on(self.process_one(url))
            }));
            outcome.unwrap_or_else(|_| {
                engine_warn!("Worker panicked while processing {}", url);
                FetchResult::failure(url.as_str(), "Processing error: worker panicked")
            })
        });

        let failures = results.iter().filter(|r| !r.is_success()).count();
        engine_info!(
            "Processed {} urls ({} failed)",
            results.len(),
            failures
        );
        results
    }

    async fn process_one(&self, url: &str) -> FetchResult {
        let output = match self.fetcher.fetch(url).await {
            Ok(output) => output,
            Err(err) => {
                engine_warn!("Fetch failed for {}: {}", url, err);
                return FetchResult::failure(url, format!("Request failed: {err}"));
            }
        };

        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        if decoded.had_errors {
            engine_debug!(
                "Lossy decode for {} using {}",
                url,
                decoded.encoding_label
            );
        }
        let page = self
            .extractor
            .extract(&decoded.html, Some(&output.metadata.final_url));

        match self.classifier.classify(url, &page).await {
            Ok(record) => {
                engine_debug!("Classified {} as {}", url, record.category);
                FetchResult::Success(record)
            }
            Err(err) => {
                engine_warn!("Classification failed for {}: {}", url, err);
                FetchResult::failure(url, format!("Processing error: {err}"))
            }
        }
    }
}
