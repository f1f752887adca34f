// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Round-zero tool forcing.
//!
//! A classifier looks at the raw question and decides whether the first model
//! call must use a specific tool. Later rounds always use automatic choice.

use crate::tools::StudyTool;

/// Decides which tool, if any, the first round must call.
pub trait IntentClassifier: Send + Sync {
    fn forced_tool(&self, question: &str, has_documents: bool) -> Option<StudyTool>;
}

const FLASHCARD_TERMS: &[&str] = &["flashcard", "flash card", "study card", "spaced repetition"];
const QUIZ_TERMS: &[&str] = &["quiz", "test me", "multiple choice", "test my knowledge"];
const GUIDE_TERMS: &[&str] = &["study guide", "outline"];
const VISUAL_TERMS: &[&str] = &["diagram", "mind map", "visualization", "chart"];

/// Case-insensitive substring matching over keyword families.
///
/// Families are checked in priority order; the first hit wins. With no hit,
/// sessions that have documents force `search_documents`.
pub struct KeywordClassifier {
    families: Vec<(StudyTool, &'static [&'static str])>,
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self {
            families: vec![
                (StudyTool::GenerateFlashcards, FLASHCARD_TERMS),
                (StudyTool::GenerateQuiz, QUIZ_TERMS),
                (StudyTool::CreateStudyGuide, GUIDE_TERMS),
                (StudyTool::GenerateVisualization, VISUAL_TERMS),
            ],
        }
    }
}

impl KeywordClassifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntentClassifier for KeywordClassifier {
    fn forced_tool(&self, question: &str, has_documents: bool) -> Option<StudyTool> {
        let lowered = question.to_lowercase();
        self.families
            .iter()
            .find(|(_, terms)| terms.iter().any(|term| lowered.contains(term)))
            .map(|(tool, _)| *tool)
            .or(has_documents.then_some(StudyTool::SearchDocuments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(question: &str, has_documents: bool) -> Option<StudyTool> {
        KeywordClassifier::new().forced_tool(question, has_documents)
    }

    #[test]
    fn keyword_families() {
        assert_eq!(classify("Make FLASHCARDS on mitosis", false), Some(StudyTool::GenerateFlashcards));
        assert_eq!(classify("can you test me on this", false), Some(StudyTool::GenerateQuiz));
        assert_eq!(classify("give me an outline", false), Some(StudyTool::CreateStudyGuide));
        assert_eq!(classify("draw a mind map", false), Some(StudyTool::GenerateVisualization));
        assert_eq!(classify("plan spaced repetition", false), Some(StudyTool::GenerateFlashcards));
    }

    #[test]
    fn earlier_family_wins() {
        assert_eq!(
            classify("quiz me, then make flashcards", true),
            Some(StudyTool::GenerateFlashcards)
        );
        assert_eq!(classify("a chart in the study guide", false), Some(StudyTool::CreateStudyGuide));
    }

    #[test]
    fn documents_force_search_only_without_keywords() {
        assert_eq!(classify("what is osmosis?", true), Some(StudyTool::SearchDocuments));
        assert_eq!(classify("what is osmosis?", false), None);
        assert_eq!(classify("multiple choice please", true), Some(StudyTool::GenerateQuiz));
    }
}
