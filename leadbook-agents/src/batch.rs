use futures::future::join_all;
use shared_types::AIParsingResponse;
use std::time::Duration;

use crate::card_extractor::CardExtractorAgent;

/// Items per chunk. Chunk members run concurrently; chunks run back to back
/// with a fixed pause, which is what keeps us inside the provider's rate
/// limits.
pub const BATCH_SIZE: usize = 5;

pub const INTER_BATCH_DELAY: Duration = Duration::from_secs(1);

/// Parse a list of OCR texts, returning exactly one response per input in
/// input order.
///
/// A failed item becomes a zero-confidence fallback carrying the error in
/// its processing notes; sibling items are unaffected. Retries stay local to
/// each item's own extraction call.
pub async fn parse_batch(agent: &CardExtractorAgent, texts: &[String]) -> Vec<AIParsingResponse> {
    let chunks: Vec<&[String]> = texts.chunks(BATCH_SIZE).collect();
    let total_chunks = chunks.len();
    let mut results = Vec::with_capacity(texts.len());

    for (index, chunk) in chunks.into_iter().enumerate() {
        tracing::info!(
            "parsing chunk {}/{} ({} cards)",
            index + 1,
            total_chunks,
            chunk.len()
        );

        let parses = chunk.iter().map(|text| async move {
            match agent.parse(text).await {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::error!("batch item failed, emitting fallback: {}", e);
                    AIParsingResponse::fallback(text.clone(), format!("extraction failed: {}", e))
                }
            }
        });

        results.extend(join_all(parses).await);

        if index + 1 < total_chunks {
            tokio::time::sleep(INTER_BATCH_DELAY).await;
        }
    }

    results
}
