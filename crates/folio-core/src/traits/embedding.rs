// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::FolioError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{EmbeddingInput, EmbeddingOutput};

/// Adapter for converting text into unit-length vectors.
///
/// Dimensionality and batch ceiling are fixed per provider for the lifetime
/// of the process; callers read them from the adapter instead of assuming a
/// value. Implementations split oversized inputs into batches themselves,
/// retry transient failures, and return an empty output for empty input
/// without touching the network.
#[async_trait]
pub trait EmbeddingAdapter: PluginAdapter {
    /// Embeds every text in `input`, preserving order.
    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, FolioError>;

    /// Width of every vector this adapter produces.
    fn dimensions(&self) -> usize;

    /// Maximum number of texts sent in one backend request.
    fn max_batch_size(&self) -> usize;

    /// Embeds a batch of texts and returns just the vectors.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, FolioError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let output = self
            .embed(EmbeddingInput {
                texts: texts.to_vec(),
            })
            .await?;
        Ok(output.embeddings)
    }

    /// Embeds a single text.
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>, FolioError> {
        let output = self
            .embed(EmbeddingInput {
                texts: vec![text.to_string()],
            })
            .await?;
        output
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| FolioError::Internal("embedding returned no vectors".to_string()))
    }
}
