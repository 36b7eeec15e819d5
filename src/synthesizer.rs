//! Two-stage answer synthesis.
//!
//! Stage 1 extracts the most relevant passage from each retrieved chunk with
//! one completion call per chunk, dispatched concurrently. Stage 2 makes a
//! single structured-output call over the combined context to produce the
//! synthesized answer and its themes. Stage-1 failures omit the affected row;
//! Stage-2 failures degrade to a default answer while keeping Stage-1 rows.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, warn};

use crate::answer::{DocumentResponse, QueryResult, parse_synthesis_reply};
use crate::completion::{CompletionModel, CompletionRequest};
use crate::config::DocQaConfig;
use crate::document::SearchResult;
use crate::error::Result;

/// Orchestrates the two-stage extraction-and-synthesis workflow over a set
/// of retrieved chunks.
pub struct AnswerSynthesizer {
    model: Arc<dyn CompletionModel>,
    config: DocQaConfig,
}

impl AnswerSynthesizer {
    /// Create a new synthesizer backed by the given completion model.
    pub fn new(model: Arc<dyn CompletionModel>, config: DocQaConfig) -> Self {
        Self { model, config }
    }

    /// Run both stages and merge the results into a [`QueryResult`].
    ///
    /// An empty `retrieved` list short-circuits to a default result without
    /// calling the completion service. Stage-1 calls run concurrently; a
    /// failed call is logged and its row omitted. Stage 2 waits for all
    /// Stage-1 outcomes, and its failure (including an unparsable structured
    /// reply) yields a default answer with empty themes rather than an error.
    pub async fn process_query(
        &self,
        query: &str,
        retrieved: &[SearchResult],
    ) -> Result<QueryResult> {
        if retrieved.is_empty() {
            info!("no retrieved chunks, returning default result");
            return Ok(QueryResult::degraded(Vec::new()));
        }

        // Stage 1: per-chunk extraction, fanned out concurrently
        let extractions = join_all(retrieved.iter().map(|r| self.extract_one(query, r))).await;

        let mut doc_responses = Vec::with_capacity(extractions.len());
        for (result, retrieved_doc) in extractions.into_iter().zip(retrieved) {
            match result {
                Ok(response) => doc_responses.push(response),
                Err(e) => {
                    warn!(
                        document.id = %retrieved_doc.chunk.doc_id,
                        chunk.id = %retrieved_doc.chunk.id,
                        error = %e,
                        "extraction call failed, omitting document from results"
                    );
                }
            }
        }

        // Stage 2: one structured synthesis call over the full context
        let request = CompletionRequest {
            prompt: self.synthesis_prompt(query, retrieved),
            model: self.config.model.clone(),
            temperature: self.config.synthesis_temperature,
            max_tokens: self.config.synthesis_max_tokens,
            json_output: true,
        };

        let reply = match self.model.complete(&request).await {
            Ok(raw) => match parse_synthesis_reply(&raw) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!(error = %e, "synthesis reply unparsable, returning default result");
                    return Ok(QueryResult::degraded(doc_responses));
                }
            },
            Err(e) => {
                warn!(error = %e, "synthesis call failed, returning default result");
                return Ok(QueryResult::degraded(doc_responses));
            }
        };

        info!(
            theme_count = reply.themes.len(),
            doc_response_count = doc_responses.len(),
            "query synthesized"
        );

        Ok(QueryResult { answer: reply.answer, themes: reply.themes, doc_responses })
    }

    /// Stage 1: extract the most relevant passage from a single chunk.
    async fn extract_one(&self, query: &str, retrieved: &SearchResult) -> Result<DocumentResponse> {
        let chunk = &retrieved.chunk;
        let request = CompletionRequest {
            prompt: format!(
                "Based on the user query: \"{query}\", extract the most relevant \
                 sentence or summary from the following document content:\n\n{}",
                chunk.text
            ),
            model: self.config.model.clone(),
            temperature: self.config.extraction_temperature,
            max_tokens: self.config.extraction_max_tokens,
            json_output: false,
        };

        let answer = self.model.complete(&request).await?;

        Ok(DocumentResponse {
            doc_id: chunk.doc_id.clone(),
            answer: answer.trim().to_string(),
            // Paragraph positions are not tracked, so the placeholder stands in
            citation: format!("Page {}, Para ?", chunk.page),
        })
    }

    /// Build the Stage-2 prompt: the query plus every retrieved chunk,
    /// each prefixed with its document id and page.
    fn synthesis_prompt(&self, query: &str, retrieved: &[SearchResult]) -> String {
        let context = retrieved
            .iter()
            .map(|r| {
                format!("Document {}, Page {}:\n{}", r.chunk.doc_id, r.chunk.page, r.chunk.text)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        format!(
            "Analyze the following documents in response to the user query: \"{query}\"\n\n\
             Documents:\n{context}\n\n\
             Return structured JSON output with:\n\
             1. 'answer': a 3-5 paragraph synthesized answer combining insights from all documents\n\
             2. 'themes': array of themes. Each theme should have:\n\
             - 'name': theme title\n\
             - 'description': 2-3 sentence explanation\n\
             - 'supporting_docs': array of {{'doc_id': '...', 'page': N}}"
        )
    }
}
