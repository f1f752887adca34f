// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the ordered backend chain from configuration.

use std::sync::Arc;

use folio_config::model::ProviderConfig;
use folio_core::{FolioError, ProviderAdapter, ProviderKind};
use folio_gemini::GeminiProvider;
use folio_openai::OpenAiProvider;
use folio_openrouter::openrouter_provider;
use tracing::{info, warn};

/// Backend kinds in fallback order: `primary` first, then every other kind
/// that has credentials. `primary` is kept even without credentials so its
/// construction error is reported.
pub fn chain_order<F>(primary: ProviderKind, has_key: F) -> Vec<ProviderKind>
where
    F: Fn(ProviderKind) -> bool,
{
    let mut order = vec![primary];
    order.extend(
        ProviderKind::ALL
            .into_iter()
            .filter(|kind| *kind != primary && has_key(*kind)),
    );
    order
}

fn build_backend(
    config: &ProviderConfig,
    kind: ProviderKind,
) -> Result<Arc<dyn ProviderAdapter>, FolioError> {
    Ok(match kind {
        ProviderKind::OpenRouter => Arc::new(openrouter_provider(config)?),
        ProviderKind::OpenAi => Arc::new(OpenAiProvider::new(config)?),
        ProviderKind::Gemini => Arc::new(GeminiProvider::new(config)?),
    })
}

/// Constructs every backend in [`chain_order`].
///
/// Backends that fail to build are skipped with a warning; an empty chain is
/// a configuration error.
pub fn build_backends(config: &ProviderConfig) -> Result<Vec<Arc<dyn ProviderAdapter>>, FolioError> {
    let primary = config.resolve_primary();
    let order = chain_order(primary, |kind| config.api_key(kind).is_some());

    let mut backends = Vec::with_capacity(order.len());
    for kind in order {
        match build_backend(config, kind) {
            Ok(backend) => backends.push(backend),
            Err(e) => warn!(provider = %kind, error = %e, "chat backend unavailable"),
        }
    }
    if backends.is_empty() {
        return Err(FolioError::Config(
            "no chat backend has credentials; set OPENROUTER_API_KEY, OPENAI_API_KEY or GOOGLE_API_KEY"
                .to_string(),
        ));
    }
    let names: Vec<_> = backends.iter().map(|b| b.kind().to_string()).collect();
    info!(primary = %primary, chain = ?names, "chat backends ready");
    Ok(backends)
}
