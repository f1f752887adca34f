// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Summary text stored for an exchange, and the preference digest built
//! from feedback history.

use folio_storage::models::{Feedback, MemoryEntry};

const QUESTION_CHARS: usize = 200;
const ANSWER_CHARS: usize = 300;
const SNIPPET_CHARS: usize = 80;
/// Entries per polarity quoted in the digest.
pub const DIGEST_SAMPLES: usize = 5;

fn prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// `"Q: <question>\nA: <answer>"`, bounded, with a feedback line when given.
pub fn summarize(question: &str, answer: &str, feedback: Option<Feedback>) -> String {
    let mut summary = format!(
        "Q: {}\nA: {}",
        prefix(question, QUESTION_CHARS),
        prefix(answer, ANSWER_CHARS)
    );
    if let Some(feedback) = feedback {
        summary.push_str(&format!("\nFeedback: {feedback}"));
    }
    summary
}

/// Two sentences quoting liked and disliked summaries, joined by `" | "`.
///
/// Empty when both lists are empty.
pub fn digest(liked: &[MemoryEntry], disliked: &[MemoryEntry]) -> String {
    let mut parts = Vec::with_capacity(2);
    if !liked.is_empty() {
        parts.push(format!("User liked responses like: {}", snippets(liked)));
    }
    if !disliked.is_empty() {
        parts.push(format!("User disliked responses like: {}", snippets(disliked)));
    }
    parts.join(" | ")
}

fn snippets(entries: &[MemoryEntry]) -> String {
    entries
        .iter()
        .take(DIGEST_SAMPLES)
        .map(|e| prefix(&e.summary, SNIPPET_CHARS))
        .collect::<Vec<_>>()
        .join("; ")
}
