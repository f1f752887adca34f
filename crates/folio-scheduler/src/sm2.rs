// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The SM-2 review transition.
//!
//! | outcome   | ease                 | interval                      | next review       |
//! |-----------|----------------------|-------------------------------|-------------------|
//! | known     | min(2.5, ease + 0.1) | max(1, floor(interval × ease)) | now + interval    |
//! | reviewing | max(1.3, ease − 0.15) | 1                            | now + 1 day       |
//! | remaining | max(1.3, ease − 0.3) | 1                             | cleared           |
//!
//! A `remaining` card has no next review date, so it stays out of the due
//! queue until it is reviewed again.

use chrono::{DateTime, Duration, Utc};
use folio_storage::{CardKey, CardStatus, FlashcardProgress};

pub const MAX_EASE: f64 = 2.5;
pub const MIN_EASE: f64 = 1.3;
pub const INITIAL_INTERVAL_DAYS: i64 = 1;

const KNOWN_BONUS: f64 = 0.1;
const REVIEWING_PENALTY: f64 = 0.15;
const REMAINING_PENALTY: f64 = 0.3;

/// Progress for a card that has never been reviewed.
pub fn new_card(key: CardKey, front: &str, now: DateTime<Utc>) -> FlashcardProgress {
    FlashcardProgress {
        key,
        card_front: front.chars().take(255).collect(),
        status: CardStatus::Remaining,
        ease_factor: MAX_EASE,
        interval_days: INITIAL_INTERVAL_DAYS,
        next_review_at: None,
        review_count: 0,
        created_at: now,
        updated_at: now,
    }
}

/// Applies one review with `outcome` at `now`.
pub fn review(card: &FlashcardProgress, outcome: CardStatus, now: DateTime<Utc>) -> FlashcardProgress {
    let (ease_factor, interval_days, next_review_at) = match outcome {
        CardStatus::Known => {
            let ease = (card.ease_factor + KNOWN_BONUS).min(MAX_EASE);
            let interval = ((card.interval_days as f64 * ease).floor() as i64).max(1);
            (ease, interval, Some(now + Duration::days(interval)))
        }
        CardStatus::Reviewing => {
            let ease = (card.ease_factor - REVIEWING_PENALTY).max(MIN_EASE);
            (ease, 1, Some(now + Duration::days(1)))
        }
        CardStatus::Remaining => {
            let ease = (card.ease_factor - REMAINING_PENALTY).max(MIN_EASE);
            (ease, 1, None)
        }
    };
    FlashcardProgress {
        status: outcome,
        ease_factor,
        interval_days,
        next_review_at,
        review_count: card.review_count + 1,
        updated_at: now,
        ..card.clone()
    }
}

/// Ease mapped onto 0..=100, rounded.
pub fn confidence(card: &FlashcardProgress) -> u8 {
    let scaled = (card.ease_factor - MIN_EASE) / (MAX_EASE - MIN_EASE) * 100.0;
    scaled.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn card(ease: f64, interval: i64) -> FlashcardProgress {
        FlashcardProgress {
            ease_factor: ease,
            interval_days: interval,
            ..new_card(
                CardKey {
                    session_id: "s".into(),
                    message_id: "m".into(),
                    card_index: 0,
                },
                "front",
                now(),
            )
        }
    }

    #[test]
    fn known_grows_interval_with_capped_ease() {
        let next = review(&card(2.5, 5), CardStatus::Known, now());
        assert_eq!(next.ease_factor, 2.5);
        assert_eq!(next.interval_days, 12);
        assert_eq!(next.next_review_at, Some(now() + Duration::days(12)));
        assert_eq!(next.review_count, 1);
        assert_eq!(next.status, CardStatus::Known);
    }

    #[test]
    fn reviewing_floors_ease() {
        let next = review(&card(1.3, 3), CardStatus::Reviewing, now());
        assert_eq!(next.ease_factor, 1.3);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.next_review_at, Some(now() + Duration::days(1)));
    }

    #[test]
    fn remaining_clears_next_review() {
        let next = review(&card(2.0, 4), CardStatus::Remaining, now());
        assert!((next.ease_factor - 1.7).abs() < 1e-9);
        assert_eq!(next.interval_days, 1);
        assert_eq!(next.next_review_at, None);
    }

    #[test]
    fn known_on_fresh_card_keeps_one_day_floor() {
        let next = review(&card(1.3, 1), CardStatus::Known, now());
        assert!((next.ease_factor - 1.4).abs() < 1e-9);
        assert_eq!(next.interval_days, 1);
    }

    #[test]
    fn confidence_scale() {
        assert_eq!(confidence(&card(2.5, 1)), 100);
        assert_eq!(confidence(&card(1.3, 1)), 0);
        assert_eq!(confidence(&card(1.9, 1)), 50);
        assert_eq!(confidence(&card(0.5, 1)), 0);
        assert_eq!(confidence(&card(3.0, 1)), 100);
    }

    #[test]
    fn new_cards_truncate_front() {
        let long = "é".repeat(300);
        let fresh = new_card(
            CardKey {
                session_id: "s".into(),
                message_id: "m".into(),
                card_index: 2,
            },
            &long,
            now(),
        );
        assert_eq!(fresh.card_front.chars().count(), 255);
        assert_eq!(fresh.ease_factor, MAX_EASE);
        assert_eq!(fresh.interval_days, 1);
    }

    fn outcome() -> impl Strategy<Value = CardStatus> {
        prop_oneof![
            Just(CardStatus::Known),
            Just(CardStatus::Reviewing),
            Just(CardStatus::Remaining),
        ]
    }

    proptest! {
        #[test]
        fn ease_and_interval_stay_in_bounds(outcomes in prop::collection::vec(outcome(), 1..40)) {
            let mut state = card(MAX_EASE, INITIAL_INTERVAL_DAYS);
            for (i, outcome) in outcomes.iter().enumerate() {
                state = review(&state, *outcome, now());
                prop_assert!(state.ease_factor >= MIN_EASE - 1e-9);
                prop_assert!(state.ease_factor <= MAX_EASE + 1e-9);
                prop_assert!(state.interval_days >= 1);
                prop_assert_eq!(state.review_count, i as i64 + 1);
                prop_assert!(confidence(&state) <= 100);
            }
        }
    }
}
