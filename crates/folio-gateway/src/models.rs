// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model id resolution.

use folio_core::ProviderKind;

/// Shorthand ids accepted on OpenRouter and the full paths they expand to.
pub const OPENROUTER_ALIASES: &[(&str, &str)] = &[
    ("gpt-4o", "openai/gpt-4o"),
    ("gpt-4o-mini", "openai/gpt-4o-mini"),
    ("gemini-2.0-flash", "google/gemini-2.0-flash-exp:free"),
    ("gemini-3-flash", "google/gemini-3-flash-preview"),
    ("gemini-3.1-pro", "google/gemini-3.1-pro-preview"),
    ("grok-3", "x-ai/grok-3"),
    ("grok-3-mini", "x-ai/grok-3-mini"),
    ("claude-3.5-sonnet", "anthropic/claude-3.5-sonnet"),
    ("claude-sonnet-4.5", "anthropic/claude-sonnet-4.5"),
    ("claude-3-haiku", "anthropic/claude-3-haiku"),
];

/// Models that reject tool declarations.
pub const NO_TOOLS_MODELS: &[&str] = &[
    "DeepSeek-R1",
    "DeepSeek-V3",
    "o1",
    "o1-mini",
    "deepseek-r1",
    "deepseek-v3",
    "deepseek/deepseek-r1",
];

/// True when `requested` names no model: absent, blank, `null` or `none`.
pub fn is_unset(requested: Option<&str>) -> bool {
    match requested.map(str::trim) {
        None | Some("") => true,
        Some(id) => id.eq_ignore_ascii_case("null") || id.eq_ignore_ascii_case("none"),
    }
}

/// Concrete model id for a backend of `kind`.
///
/// Unset ids resolve to `default_model`. On OpenRouter, ids without a vendor
/// prefix are expanded through [`OPENROUTER_ALIASES`]; unknown shorthands pass
/// through untouched.
pub fn resolve_model(kind: ProviderKind, requested: Option<&str>, default_model: &str) -> String {
    let Some(id) = requested.filter(|_| !is_unset(requested)).map(str::trim) else {
        return default_model.to_string();
    };
    if kind == ProviderKind::OpenRouter && !id.contains('/') {
        if let Some((_, full)) = OPENROUTER_ALIASES.iter().find(|(short, _)| *short == id) {
            return (*full).to_string();
        }
    }
    id.to_string()
}

pub fn supports_tools(model: &str) -> bool {
    !NO_TOOLS_MODELS.contains(&model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_use_default() {
        for requested in [None, Some(""), Some("  "), Some("null"), Some("None")] {
            assert_eq!(
                resolve_model(ProviderKind::OpenAi, requested, "gpt-4o"),
                "gpt-4o",
                "{requested:?}"
            );
        }
    }

    #[test]
    fn openrouter_expands_aliases() {
        assert_eq!(
            resolve_model(ProviderKind::OpenRouter, Some("grok-3"), "openai/gpt-4o"),
            "x-ai/grok-3"
        );
        assert_eq!(
            resolve_model(ProviderKind::OpenRouter, Some("meta/llama-3"), "openai/gpt-4o"),
            "meta/llama-3"
        );
        assert_eq!(
            resolve_model(ProviderKind::OpenRouter, Some("mystery"), "openai/gpt-4o"),
            "mystery"
        );
    }

    #[test]
    fn other_backends_keep_shorthand() {
        assert_eq!(
            resolve_model(ProviderKind::OpenAi, Some("gpt-4o-mini"), "gpt-4o"),
            "gpt-4o-mini"
        );
        assert_eq!(
            resolve_model(ProviderKind::Gemini, Some("gemini-2.0-flash"), "x"),
            "gemini-2.0-flash"
        );
    }

    #[test]
    fn reasoning_models_do_not_get_tools() {
        assert!(!supports_tools("o1-mini"));
        assert!(!supports_tools("deepseek/deepseek-r1"));
        assert!(supports_tools("openai/gpt-4o"));
    }
}
