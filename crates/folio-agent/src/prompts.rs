// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt assembly and history shaping.

use folio_core::{ChatMessage, Role};

/// Fixed assistant persona.
pub const PERSONA: &str = "You are Folio, an analytical study assistant who helps users deeply \
understand their documents.\n\
- Structured and clear: always use Markdown (headers, lists, bold, code blocks)\n\
- Adaptive depth: concise for quick lookups; thorough with examples for concepts\n\
- Math formatting: Always wrap mathematical variables, expressions, and formulas in \
$...$ for inline math and $$...$$ for block math. Do not use plain parentheses for math.\n\
- Never fabricate: if info is absent from context, say so\n";

/// Extra guidance keyed by uploaded file type.
pub const FILE_TYPE_MODIFIERS: &[(&str, &str)] = &[
    ("pdf", "\nThe document is a PDF. Pay attention to page references and structure."),
    ("docx", "\nThe document is a Word file. Focus on textual content and formatting."),
    ("txt", "\nThe document is a plain text file. Focus on the raw content."),
    (
        "image",
        "\nThe content includes an image. You can see it directly. Describe what you \
observe and answer the user's question based on the visual content.",
    ),
];

const WITH_DOCUMENTS_RULES: &str = "\n\nDOCUMENTS ARE UPLOADED in this session. Rules:\n\
- ALWAYS call search_documents first before answering any question.\n\
- Base your answer STRICTLY on the retrieved document content.\n\
- If information is not found in the documents, say exactly: \
'I cannot find that information in your document.' Do NOT guess.\n\
- ALWAYS call generate_flashcards when asked for flashcards.\n\
- ALWAYS call generate_quiz when asked for a quiz.\n\
- ALWAYS call create_study_guide when asked for a study guide.\n\
- ALWAYS call generate_visualization when asked for a diagram or chart.";

const WITHOUT_DOCUMENTS_RULES: &str = "\n\nNo documents in this session. Rules:\n\
- Answer general questions directly from your own knowledge.\n\
- ALWAYS call generate_flashcards when asked for flashcards.\n\
- ALWAYS call generate_quiz when asked for a quiz.\n\
- ALWAYS call create_study_guide when asked for a study guide.\n\
- ALWAYS call generate_visualization when asked for a diagram or chart.\n\
- DO NOT produce flashcards or quiz questions as plain text.";

const DEEP_THINK: &str = "\n\nThink step by step. Be thorough, exhaustive, and analytical.";

/// Inputs that shape the system prompt for one turn.
#[derive(Debug, Clone, Default)]
pub struct PromptOptions<'a> {
    pub file_type: &'a str,
    pub memory_context: &'a str,
    pub preference_context: &'a str,
    pub has_documents: bool,
    pub deep_think: bool,
}

pub fn file_type_modifier(file_type: &str) -> &'static str {
    FILE_TYPE_MODIFIERS
        .iter()
        .find(|(kind, _)| *kind == file_type)
        .map(|(_, text)| *text)
        .unwrap_or("")
}

pub fn system_prompt(options: &PromptOptions<'_>) -> String {
    let mut prompt = String::from(PERSONA);
    prompt.push_str(file_type_modifier(options.file_type));
    if !options.memory_context.is_empty() {
        prompt.push_str("\n\nBased on past sessions: ");
        prompt.push_str(options.memory_context);
    }
    if !options.preference_context.is_empty() {
        prompt.push_str("\n\nUser preferences: ");
        prompt.push_str(options.preference_context);
    }
    prompt.push_str(if options.has_documents {
        WITH_DOCUMENTS_RULES
    } else {
        WITHOUT_DOCUMENTS_RULES
    });
    if options.deep_think {
        prompt.push_str(DEEP_THINK);
    }
    prompt
}

/// System prompt, filtered history, then the new question.
///
/// Only user and assistant entries with non-empty content survive; tool
/// traffic from earlier turns is dropped.
pub fn build_messages(system: String, history: &[ChatMessage], question: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(system));
    for entry in history {
        let Some(content) = entry.content.as_deref().filter(|c| !c.is_empty()) else {
            continue;
        };
        match entry.role {
            Role::User => messages.push(ChatMessage::user(content)),
            Role::Assistant => messages.push(ChatMessage::assistant(content)),
            Role::System | Role::Tool => {}
        }
    }
    messages.push(ChatMessage::user(question));
    messages
}
