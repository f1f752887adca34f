// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Agentic orchestration for Folio conversations.
//!
//! [`ChatEngine`] runs a bounded loop of model calls and tool executions for
//! one question: it forces a first tool when the question asks for one,
//! executes requested tools on the blocking pool, collects artifacts and
//! sources, and always ends with a user-safe answer when the model fails.

pub mod blocking;
pub mod context;
pub mod engine;
pub mod executor;
pub mod intent;
pub mod prompts;
pub mod title;
pub mod tools;

pub use context::TurnContext;
pub use engine::{
    ChatEngine, DEFAULT_MAX_ROUNDS, ERROR_ANSWER, EXHAUSTED_ANSWER, ToolCallRecord, TurnOutcome,
    TurnRequest,
};
pub use executor::RetrievalToolExecutor;
pub use intent::{IntentClassifier, KeywordClassifier};
pub use tools::{StudyTool, catalogue};
