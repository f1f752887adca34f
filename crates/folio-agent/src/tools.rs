// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The fixed tool catalogue offered to the model on every round.

use folio_core::ToolDefinition;
use serde_json::json;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Tools the model may request mid-conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum StudyTool {
    SearchDocuments,
    GenerateFlashcards,
    GenerateQuiz,
    CreateStudyGuide,
    GenerateVisualization,
}

impl StudyTool {
    pub fn definition(self) -> ToolDefinition {
        let (description, parameters) = match self {
            StudyTool::SearchDocuments => (
                "Search the documents uploaded to this session and return the most relevant passages with page numbers.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "What to look for"},
                        "n_results": {"type": "integer", "minimum": 1, "maximum": 20, "default": 5}
                    },
                    "required": ["query"]
                }),
            ),
            StudyTool::GenerateFlashcards => (
                "Generate a set of flashcards (front/back) for spaced-repetition study.",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {"type": "string", "description": "Subject of the cards"},
                        "count": {"type": "integer", "minimum": 1, "maximum": 50, "default": 10}
                    },
                    "required": ["topic"]
                }),
            ),
            StudyTool::GenerateQuiz => (
                "Generate a multiple-choice quiz with answers and explanations.",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {"type": "string"},
                        "num_questions": {"type": "integer", "minimum": 1, "maximum": 30, "default": 5},
                        "difficulty": {"type": "string", "enum": ["easy", "medium", "hard"]}
                    },
                    "required": ["topic"]
                }),
            ),
            StudyTool::CreateStudyGuide => (
                "Create a structured study guide or outline with key concepts and summaries.",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {"type": "string"}
                    },
                    "required": ["topic"]
                }),
            ),
            StudyTool::GenerateVisualization => (
                "Produce a diagram, mind map or chart describing relationships between concepts.",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {"type": "string"},
                        "diagram_type": {
                            "type": "string",
                            "enum": ["flowchart", "mindmap", "sequence", "timeline", "chart"]
                        }
                    },
                    "required": ["topic"]
                }),
            ),
        };
        ToolDefinition {
            name: self.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

/// Every tool definition, in a stable order.
pub fn catalogue() -> Vec<ToolDefinition> {
    StudyTool::iter().map(StudyTool::definition).collect()
}
