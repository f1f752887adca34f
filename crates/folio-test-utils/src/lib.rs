// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Folio integration tests.
//!
//! Provides `MockProvider` (scripted chat replies), `MockEmbedder`
//! (deterministic unit vectors), `RecordingExecutor` and `RecordingSink`
//! (call and event capture) plus a temp-dir database helper.

pub mod harness;
pub mod mock_embedder;
pub mod mock_provider;
pub mod recording;

pub use harness::temp_database;
pub use mock_embedder::MockEmbedder;
pub use mock_provider::{MockProvider, MockReply};
pub use recording::{RecordedCall, RecordingExecutor, RecordingSink};
