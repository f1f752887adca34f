// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions.
//!
//! Backends extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod embedding;
pub mod progress;
pub mod provider;
pub mod tool;

pub use adapter::PluginAdapter;
pub use embedding::EmbeddingAdapter;
pub use progress::{IndexProgressSink, NoopSink, ProgressSink};
pub use provider::{ChatStream, ProviderAdapter};
pub use tool::ToolExecutor;
