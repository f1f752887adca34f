// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types for the three persisted entities.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Timestamp text as stored in every table (RFC 3339, millisecond precision, `Z`).
///
/// The fixed width keeps lexicographic and chronological order identical.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Inverse of [`format_timestamp`]. Unparseable text yields `None`.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

/// One stored chunk of document text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Insertion sequence; also the tie-break key for ranking.
    pub id: i64,
    pub session_id: String,
    pub user_id: String,
    pub document_id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub pages: Vec<u32>,
    pub chunk_index: i64,
}

/// A chunk ready to be written, embedding already computed.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub session_id: String,
    pub user_id: String,
    pub document_id: String,
    pub text: String,
    pub embedding: Vec<f32>,
    pub pages: Vec<u32>,
    pub chunk_index: i64,
}

/// Thumbs up / thumbs down left on an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Up,
    Down,
}

/// A memory about to be written.
#[derive(Debug, Clone)]
pub struct NewMemory {
    pub user_id: String,
    pub session_id: Option<String>,
    pub summary: String,
    pub embedding: Vec<f32>,
    pub feedback: Option<Feedback>,
}

/// A remembered question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub id: i64,
    pub user_id: String,
    pub session_id: Option<String>,
    pub summary: String,
    pub embedding: Vec<f32>,
    pub feedback: Option<Feedback>,
    pub created_at: String,
}

/// Learning state of one flashcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    Known,
    Reviewing,
    Remaining,
}

/// Identifies one card: the generated set lives in a chat message of a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub session_id: String,
    pub message_id: String,
    pub card_index: i64,
}

/// Persisted SM-2 state for one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashcardProgress {
    pub key: CardKey,
    pub card_front: String,
    pub status: CardStatus,
    pub ease_factor: f64,
    pub interval_days: i64,
    /// `None` keeps the card out of the due queue.
    pub next_review_at: Option<DateTime<Utc>>,
    pub review_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Card counts per status for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryCounts {
    pub known: u32,
    pub reviewing: u32,
    pub remaining: u32,
}

impl MasteryCounts {
    pub fn total(&self) -> u32 {
        self.known + self.reviewing + self.remaining
    }
}
