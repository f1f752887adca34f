// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::FolioConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &FolioConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.agent.log_level.to_ascii_lowercase().as_str()) {
        fail(format!(
            "agent.log_level `{}` is not one of {}",
            config.agent.log_level,
            LOG_LEVELS.join(", ")
        ));
    }

    if config.agent.max_rounds < 1 {
        fail("agent.max_rounds must be at least 1".to_string());
    }

    if config.embedding.max_attempts < 1 {
        fail("embedding.max_attempts must be at least 1".to_string());
    }

    if config.retrieval.default_k < 1 {
        fail("retrieval.default_k must be at least 1".to_string());
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let urls = [
        ("provider.openrouter_base_url", &config.provider.openrouter_base_url),
        ("provider.openai_base_url", &config.provider.openai_base_url),
        ("provider.gemini_base_url", &config.provider.gemini_base_url),
    ];
    for (key, url) in urls {
        if url.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        } else if !url.starts_with("http://") && !url.starts_with("https://") {
            fail(format!("{key} `{url}` must start with http:// or https://"));
        }
    }

    if config.provider.timeout_secs == 0 {
        fail("provider.timeout_secs must be greater than 0".to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
