// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Long-term memory for the Folio study engine.
//!
//! Each answered question can be remembered as a bounded summary with an
//! embedding and optional thumbs-up/down feedback. [`MemoryRanker`] recalls
//! the summaries closest to a new question and turns feedback history into a
//! short preference digest for the system prompt.

pub mod ranker;
pub mod summary;

pub use ranker::{MemoryRanker, rank_memories};
pub use summary::{digest, summarize};
