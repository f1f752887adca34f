// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document retrieval for the Folio study engine.
//!
//! [`VectorStore`] embeds and persists chunks and answers exact cosine
//! queries by linear scan. [`RetrievalService`] scopes those queries to a
//! session or a user, discovers related sessions and builds citations.

pub mod service;
pub mod store;

pub use service::{Citation, RetrievalService, build_citations};
pub use store::{ChunkInput, RelatedScope, SearchResult, VectorStore};
