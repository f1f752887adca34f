// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model gateway for the Folio study engine.
//!
//! Resolves caller-supplied model ids (including OpenRouter shorthands),
//! orders the configured chat backends into a fallback chain and retries
//! tool-enabled requests once without tools before moving on.

pub mod gateway;
pub mod models;
pub mod registry;

pub use gateway::{ChatCall, ModelGateway, STREAM_MAX_TOKENS};
pub use models::{NO_TOOLS_MODELS, OPENROUTER_ALIASES, is_unset, resolve_model, supports_tools};
pub use registry::build_backends;
