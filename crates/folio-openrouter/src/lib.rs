// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenRouter chat backend.
//!
//! OpenRouter speaks the OpenAI chat completions protocol, so this crate only
//! contributes the base URL, the attribution headers and the provider kind.
//! Model ids are fully qualified (`vendor/model`); alias expansion happens in
//! the gateway.

use std::time::Duration;

use folio_config::model::ProviderConfig;
use folio_core::{FolioError, ProviderKind};
use folio_openai::{OpenAiClient, OpenAiProvider};
use tracing::info;

/// Sent as `HTTP-Referer` so requests are attributed to the app.
pub const APP_URL: &str = "https://github.com/folio-study/folio";
/// Sent as `X-Title`.
pub const APP_TITLE: &str = "Folio";

/// Builds the OpenRouter chat backend from configuration.
///
/// The API key comes from `provider.openrouter_api_key` or
/// `OPENROUTER_API_KEY`.
pub fn openrouter_provider(config: &ProviderConfig) -> Result<OpenAiProvider, FolioError> {
    let api_key = config
        .api_key(ProviderKind::OpenRouter)
        .ok_or_else(|| FolioError::Config("OpenRouter backend needs OPENROUTER_API_KEY".into()))?;
    let client = OpenAiClient::new(
        &api_key,
        config.base_url(ProviderKind::OpenRouter),
        Duration::from_secs(config.timeout_secs),
        &[("http-referer", APP_URL), ("x-title", APP_TITLE)],
    )?;
    info!(model = config.openrouter_model, "OpenRouter provider initialized");
    Ok(OpenAiProvider::with_client(
        client,
        ProviderKind::OpenRouter,
        "openrouter",
        config.openrouter_model.clone(),
    ))
}
