// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short conversation titles.

use folio_core::ProviderKind;

pub const TITLE_FALLBACK: &str = "New Chat";

pub fn title_prompt(first_message: &str) -> String {
    format!(
        "Summarize the user's intent in exactly 2 to 3 words. No quotes. Nothing else.\n\nUser: {first_message}"
    )
}

/// Model used for titles on `kind`; `None` means the backend default.
pub fn title_model(kind: ProviderKind) -> Option<&'static str> {
    match kind {
        ProviderKind::OpenRouter => Some("openai/gpt-4o-mini"),
        ProviderKind::OpenAi => Some("gpt-4o-mini"),
        ProviderKind::Gemini => None,
    }
}

/// Normalizes a model reply into a title.
///
/// Double quotes are removed. A reply longer than four words is cut to three.
pub fn clean_title(reply: &str) -> String {
    let unquoted = reply.replace('"', "");
    let mut words: Vec<&str> = unquoted.split_whitespace().collect();
    if words.len() > 4 {
        words.truncate(3);
    }
    if words.is_empty() {
        TITLE_FALLBACK.to_string()
    } else {
        words.join(" ")
    }
}
