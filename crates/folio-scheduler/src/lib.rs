// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spaced-repetition scheduling for flashcards.
//!
//! [`sm2`] holds the pure transition; [`review`] persists it.

pub mod review;
pub mod sm2;

pub use review::{due_cards, record_review, session_mastery};
pub use sm2::{MAX_EASE, MIN_EASE, confidence, new_card};
