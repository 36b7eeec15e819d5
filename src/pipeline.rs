//! Pipeline coordinator.
//!
//! [`DocQaPipeline`] wires ingestion (extract → chunk → embed → store) and
//! query time (retrieve → synthesize) together and owns the per-corpus
//! lifecycle: each ingestion run discards the previous corpus entirely.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa::{DocQaPipeline, DocQaConfig, InMemoryVectorStore, RawDocument};
//!
//! let pipeline = DocQaPipeline::builder()
//!     .config(DocQaConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .completion_model(Arc::new(my_model))
//!     .build()?;
//!
//! let count = pipeline.ingest(&documents).await?;
//! let result = pipeline.answer("What color is grass?").await?;
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::answer::QueryResult;
use crate::chunking::{Chunker, RecursiveChunker};
use crate::completion::CompletionModel;
use crate::config::DocQaConfig;
use crate::document::{RawDocument, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{DocQaError, Result};
use crate::extract::{MediaExtractor, TextExtractor};
use crate::synthesizer::AnswerSynthesizer;
use crate::vectorstore::VectorStore;

/// Default vector store collection name for the active corpus.
const DEFAULT_COLLECTION: &str = "documents";

/// The document question-answering coordinator.
///
/// Owns exactly one active corpus at a time. [`ingest`](DocQaPipeline::ingest)
/// and the query operations are mutually exclusive via a phase lock, while
/// concurrent queries against a stable corpus run in parallel. Construct one
/// via [`DocQaPipeline::builder()`].
pub struct DocQaPipeline {
    config: DocQaConfig,
    extractor: Arc<dyn TextExtractor>,
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    synthesizer: AnswerSynthesizer,
    collection: String,
    // Write side taken by ingest, read side by queries, so an ingestion run
    // never interleaves with queries against the corpus it is replacing.
    phase: RwLock<()>,
}

impl std::fmt::Debug for DocQaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocQaPipeline")
            .field("config", &self.config)
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}

impl DocQaPipeline {
    /// Create a new [`DocQaPipelineBuilder`].
    pub fn builder() -> DocQaPipelineBuilder {
        DocQaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &DocQaConfig {
        &self.config
    }

    /// Ingest a document set, replacing the previous corpus.
    ///
    /// Each document is run through text extraction, chunking, and embedding;
    /// the embedded chunks are stored in a single upsert. Documents that fail
    /// extraction or yield no extractable text are skipped with a warning.
    /// Returns the total number of chunks indexed, so callers can report
    /// "processed N chunks from M files".
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Embedding`] if embedding fails; in that case no
    /// chunk of the batch is stored and the new corpus is left empty.
    pub async fn ingest(&self, documents: &[RawDocument]) -> Result<usize> {
        let _phase = self.phase.write().await;

        // New corpus generation: the prior one is discarded, not merged
        self.vector_store.delete_collection(&self.collection).await?;
        self.vector_store
            .create_collection(&self.collection, self.embedding_provider.dimensions())
            .await?;

        let mut chunks = Vec::new();
        for document in documents {
            let text = match self
                .extractor
                .extract(&document.doc_id, &document.bytes, &document.media_type)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    warn!(document.id = %document.doc_id, error = %e, "extraction failed, skipping document");
                    continue;
                }
            };

            let document_chunks = self.chunker.chunk(&document.doc_id, &text);
            if document_chunks.is_empty() {
                warn!(document.id = %document.doc_id, "no extractable text, skipping document");
                continue;
            }
            chunks.extend(document_chunks);
        }

        if chunks.is_empty() {
            info!(document_count = documents.len(), chunk_count = 0, "corpus ingested (empty)");
            return Ok(0);
        }

        // Embed everything before any upsert: a failed embedding batch must
        // not leave a partially populated corpus behind.
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.inspect_err(|e| {
            error!(error = %e, "embedding failed during ingestion");
        })?;
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.upsert(&self.collection, &chunks).await.map_err(|e| {
            error!(error = %e, "upsert failed during ingestion");
            DocQaError::Pipeline(format!("upsert failed for collection '{}': {e}", self.collection))
        })?;

        info!(document_count = documents.len(), chunk_count = chunks.len(), "corpus ingested");

        Ok(chunks.len())
    }

    /// Retrieve the `top_k` chunks most relevant to `query`.
    ///
    /// Returns an empty list when nothing has been ingested yet.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Retrieval`] if query embedding or the index
    /// search fails; no partial result is returned.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        let _phase = self.phase.read().await;
        self.retrieve_inner(query).await
    }

    /// Answer a query: retrieve relevant chunks, then run the two-stage
    /// synthesis over them.
    pub async fn answer(&self, query: &str) -> Result<QueryResult> {
        let _phase = self.phase.read().await;
        let retrieved = self.retrieve_inner(query).await?;
        self.synthesizer.process_query(query, &retrieved).await
    }

    /// Retrieval body, called with the phase lock already held.
    async fn retrieve_inner(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            DocQaError::Retrieval(format!("query embedding failed: {e}"))
        })?;

        let results = self
            .vector_store
            .search(&self.collection, &query_embedding, self.config.top_k)
            .await
            .map_err(|e| {
                error!(collection = %self.collection, error = %e, "index search failed");
                DocQaError::Retrieval(format!(
                    "search failed in collection '{}': {e}",
                    self.collection
                ))
            })?;

        info!(result_count = results.len(), "retrieval completed");

        Ok(results)
    }
}

/// Builder for constructing a [`DocQaPipeline`].
///
/// The embedding provider, vector store, and completion model are required.
/// The extractor defaults to [`MediaExtractor`], the chunker to a
/// [`RecursiveChunker`] sized from the configuration, and the configuration
/// to [`DocQaConfig::default()`].
#[derive(Default)]
pub struct DocQaPipelineBuilder {
    config: Option<DocQaConfig>,
    extractor: Option<Arc<dyn TextExtractor>>,
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    completion_model: Option<Arc<dyn CompletionModel>>,
    collection: Option<String>,
}

impl DocQaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: DocQaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the text extractor.
    pub fn extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the completion model used by both synthesis stages.
    pub fn completion_model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.completion_model = Some(model);
        self
    }

    /// Set the vector store collection name for the corpus.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.collection = Some(name.into());
        self
    }

    /// Build the [`DocQaPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`DocQaError::Config`] if any required field is missing.
    pub fn build(self) -> Result<DocQaPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| DocQaError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| DocQaError::Config("vector_store is required".to_string()))?;
        let completion_model = self
            .completion_model
            .ok_or_else(|| DocQaError::Config("completion_model is required".to_string()))?;

        let extractor = self.extractor.unwrap_or_else(|| Arc::new(MediaExtractor::new()));
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        });
        let synthesizer = AnswerSynthesizer::new(completion_model, config.clone());

        Ok(DocQaPipeline {
            config,
            extractor,
            chunker,
            embedding_provider,
            vector_store,
            synthesizer,
            collection: self.collection.unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            phase: RwLock::new(()),
        })
    }
}
