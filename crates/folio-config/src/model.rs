// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Folio study engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use folio_core::{EmbeddingProvider, ProviderKind};
use serde::{Deserialize, Serialize};

/// Top-level Folio configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FolioConfig {
    /// Conversation loop behavior.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Chat backends and credentials.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Embedding backend settings.
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Similarity search defaults.
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Orchestration loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Tool rounds before the loop forces a tool-less final answer.
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Default document type used to pick the system prompt modifier.
    #[serde(default = "default_file_type")]
    pub file_type: String,

    /// How many long-term memories are injected into the system prompt.
    #[serde(default = "default_memory_results")]
    pub memory_results: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_rounds: default_max_rounds(),
            file_type: default_file_type(),
            memory_results: default_memory_results(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_rounds() -> usize {
    3
}

fn default_file_type() -> String {
    "pdf".to_string()
}

fn default_memory_results() -> usize {
    3
}

/// Chat backend configuration.
///
/// API keys fall back to the conventional environment variables
/// (`OPENROUTER_API_KEY`, `OPENAI_API_KEY`, `GOOGLE_API_KEY` / `GEMINI_API_KEY`)
/// when not set here.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderConfig {
    /// Primary chat backend. Detected from available credentials when unset.
    #[serde(default)]
    pub primary: Option<ProviderKind>,

    #[serde(default)]
    pub openrouter_api_key: Option<String>,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Default model for OpenRouter (fully qualified `vendor/model` id).
    #[serde(default = "default_openrouter_model")]
    pub openrouter_model: String,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    #[serde(default = "default_openrouter_base_url")]
    pub openrouter_base_url: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            primary: None,
            openrouter_api_key: None,
            openai_api_key: None,
            gemini_api_key: None,
            openrouter_model: default_openrouter_model(),
            openai_model: default_openai_model(),
            gemini_model: default_gemini_model(),
            openrouter_base_url: default_openrouter_base_url(),
            openai_base_url: default_openai_base_url(),
            gemini_base_url: default_gemini_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_openrouter_model() -> String {
    "openai/gpt-4o".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_openrouter_base_url() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

/// Environment variables consulted for each backend's key, in order.
fn key_env_vars(kind: ProviderKind) -> &'static [&'static str] {
    match kind {
        ProviderKind::OpenRouter => &["OPENROUTER_API_KEY"],
        ProviderKind::OpenAi => &["OPENAI_API_KEY"],
        ProviderKind::Gemini => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
    }
}

/// Treats empty strings and the literals "null"/"none" as unset.
fn meaningful(value: Option<String>) -> Option<String> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !v.eq_ignore_ascii_case("null") && !v.eq_ignore_ascii_case("none")
    })
}

impl ProviderConfig {
    /// API key for `kind`: config value first, then the process environment.
    pub fn api_key(&self, kind: ProviderKind) -> Option<String> {
        self.api_key_with(kind, |var| std::env::var(var).ok())
    }

    /// Like [`api_key`](Self::api_key) with an explicit environment lookup.
    pub fn api_key_with<F>(&self, kind: ProviderKind, env: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let configured = match kind {
            ProviderKind::OpenRouter => &self.openrouter_api_key,
            ProviderKind::OpenAi => &self.openai_api_key,
            ProviderKind::Gemini => &self.gemini_api_key,
        };
        if let Some(key) = meaningful(configured.clone()) {
            return Some(key);
        }
        key_env_vars(kind)
            .iter()
            .find_map(|var| meaningful(env(var)))
    }

    /// The primary chat backend, decided once at startup.
    ///
    /// Order: explicit `primary`, then the first backend with credentials
    /// (OpenRouter, OpenAI, Gemini), else OpenAI.
    pub fn resolve_primary(&self) -> ProviderKind {
        self.resolve_primary_with(|var| std::env::var(var).ok())
    }

    /// Like [`resolve_primary`](Self::resolve_primary) with an explicit environment lookup.
    pub fn resolve_primary_with<F>(&self, env: F) -> ProviderKind
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(primary) = self.primary {
            return primary;
        }
        ProviderKind::ALL
            .into_iter()
            .find(|kind| self.api_key_with(*kind, &env).is_some())
            .unwrap_or(ProviderKind::OpenAi)
    }

    /// Configured default chat model for `kind`.
    pub fn default_model(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenRouter => &self.openrouter_model,
            ProviderKind::OpenAi => &self.openai_model,
            ProviderKind::Gemini => &self.gemini_model,
        }
    }

    /// API base URL for `kind`.
    pub fn base_url(&self, kind: ProviderKind) -> &str {
        match kind {
            ProviderKind::OpenRouter => &self.openrouter_base_url,
            ProviderKind::OpenAi => &self.openai_base_url,
            ProviderKind::Gemini => &self.gemini_base_url,
        }
    }
}

/// Embedding backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmbeddingConfig {
    /// Embedding backend. Detected from available credentials when unset.
    #[serde(default)]
    pub provider: Option<EmbeddingProvider>,

    /// Attempts per batch before the call fails as retrieval-unavailable.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff unit in milliseconds; attempt `n` waits `base * 2^n`.
    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: None,
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    4
}

fn default_backoff_base_ms() -> u64 {
    1000
}

impl EmbeddingConfig {
    /// The embedding backend, decided once at startup.
    ///
    /// Order: explicit `provider`, then OpenAI credentials, then Gemini
    /// credentials. `None` means no embedding backend is available.
    pub fn resolve_provider(&self, providers: &ProviderConfig) -> Option<EmbeddingProvider> {
        self.resolve_provider_with(providers, |var| std::env::var(var).ok())
    }

    pub fn resolve_provider_with<F>(
        &self,
        providers: &ProviderConfig,
        env: F,
    ) -> Option<EmbeddingProvider>
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.provider.is_some() {
            return self.provider;
        }
        if providers.api_key_with(ProviderKind::OpenAi, &env).is_some() {
            Some(EmbeddingProvider::OpenAi)
        } else if providers.api_key_with(ProviderKind::Gemini, &env).is_some() {
            Some(EmbeddingProvider::Gemini)
        } else {
            None
        }
    }
}

/// Similarity search defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetrievalConfig {
    /// Results returned by a search when the caller does not say.
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Maximum related scopes returned by discovery.
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// Anchor chunks averaged into the origin scope's centroid.
    #[serde(default = "default_anchor_sample")]
    pub anchor_sample: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            related_limit: default_related_limit(),
            anchor_sample: default_anchor_sample(),
        }
    }
}

fn default_k() -> usize {
    5
}

fn default_related_limit() -> usize {
    5
}

fn default_anchor_sample() -> usize {
    5
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("folio").join("folio.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("folio.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
