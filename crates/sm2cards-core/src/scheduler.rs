// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The SM-2 review transition.

use crate::config::FIRST_INTERVAL_DAYS;
use crate::config::MIN_EASE_FACTOR;
use crate::config::SECOND_INTERVAL_DAYS;
use crate::error::Corruption;
use crate::error::SchedulerError;
use crate::types::score::PerformanceScore;
use crate::types::state::CardSchedulingState;
use crate::types::timestamp::Timestamp;

/// Which interval rule a review falls under.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Regime {
    /// The recall failed.
    Failed,
    /// The first passing recall after a failure or a fresh start.
    FirstRecall,
    /// The second consecutive passing recall.
    SecondRecall,
    /// Three or more consecutive passing recalls.
    Established,
}

impl Regime {
    /// Classify a review given the streak the card is on before it.
    pub fn classify(score: PerformanceScore, consecutive_correct: u32) -> Self {
        if !score.is_passing() {
            return Regime::Failed;
        }
        match consecutive_correct.saturating_add(1) {
            1 => Regime::FirstRecall,
            2 => Regime::SecondRecall,
            _ => Regime::Established,
        }
    }
}

/// Compute a card's next scheduling state from its current one.
///
/// `performance` must be in `[0, 5]`. The input state is only read, and
/// nothing is computed if validation fails.
pub fn compute_next_state(
    current: &CardSchedulingState,
    performance: i64,
    now: Timestamp,
) -> Result<CardSchedulingState, SchedulerError> {
    let score = PerformanceScore::try_from(performance)?;
    schedule(current, score, now)
}

/// Like [`compute_next_state`], for a score that is already validated.
pub fn schedule(
    current: &CardSchedulingState,
    score: PerformanceScore,
    now: Timestamp,
) -> Result<CardSchedulingState, SchedulerError> {
    check_ease(current.ease_factor)?;
    let review_count = current
        .review_count
        .checked_add(1)
        .ok_or(SchedulerError::CounterOverflow)?;
    let regime = Regime::classify(score, current.consecutive_correct);
    let (interval, consecutive_correct, ease_factor) = match regime {
        Regime::Failed => (FIRST_INTERVAL_DAYS, 0, current.ease_factor),
        Regime::FirstRecall => (
            FIRST_INTERVAL_DAYS,
            1,
            next_ease_factor(current.ease_factor, score),
        ),
        Regime::SecondRecall => (
            SECOND_INTERVAL_DAYS,
            2,
            next_ease_factor(current.ease_factor, score),
        ),
        Regime::Established => (
            grown_interval(current)?,
            current
                .consecutive_correct
                .checked_add(1)
                .ok_or(SchedulerError::CounterOverflow)?,
            next_ease_factor(current.ease_factor, score),
        ),
    };
    let next_review_date = now
        .plus_days(interval)
        .ok_or(SchedulerError::IntervalOverflow {
            interval: f64::from(interval),
        })?;
    Ok(CardSchedulingState {
        interval,
        ease_factor,
        consecutive_correct,
        review_count,
        last_reviewed: Some(now),
        next_review_date,
    })
}

fn check_ease(ease_factor: f64) -> Result<(), SchedulerError> {
    if ease_factor.is_nan() || ease_factor < MIN_EASE_FACTOR {
        return Err(SchedulerError::CorruptState(Corruption::EaseBelowFloor {
            ease_factor,
        }));
    }
    Ok(())
}

/// The prior interval scaled by the prior ease factor, rounded half away
/// from zero.
fn grown_interval(current: &CardSchedulingState) -> Result<u32, SchedulerError> {
    if current.interval == 0 {
        return Err(SchedulerError::CorruptState(Corruption::MissingInterval {
            consecutive_correct: current.consecutive_correct,
        }));
    }
    let interval = (f64::from(current.interval) * current.ease_factor).round();
    if interval > f64::from(u32::MAX) {
        return Err(SchedulerError::IntervalOverflow { interval });
    }
    Ok(interval as u32)
}

/// The SM-2 ease adjustment: +0.1 for a perfect score, shrinking as the
/// score drops, floored at 1.3 and never capped.
pub fn next_ease_factor(ease_factor: f64, score: PerformanceScore) -> f64 {
    let s = score.shortfall();
    f64::max(MIN_EASE_FACTOR, ease_factor + (0.1 - s * (0.08 + s * 0.02)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CardDefaults;

    /// Approximate equality.
    fn feq(a: f64, b: f64) -> bool {
        f64::abs(a - b) < 1e-9
    }

    fn ts(s: &str) -> Timestamp {
        Timestamp::try_from(s.to_string()).unwrap()
    }

    fn score(value: i64) -> PerformanceScore {
        PerformanceScore::try_from(value).unwrap()
    }

    fn fresh() -> CardSchedulingState {
        CardSchedulingState {
            interval: 0,
            ease_factor: 2.5,
            consecutive_correct: 0,
            review_count: 0,
            last_reviewed: None,
            next_review_date: ts("2024-01-01T12:00:00.000"),
        }
    }

    fn state(interval: u32, ease_factor: f64, consecutive_correct: u32) -> CardSchedulingState {
        CardSchedulingState {
            interval,
            ease_factor,
            consecutive_correct,
            review_count: consecutive_correct,
            last_reviewed: Some(ts("2024-01-01T12:00:00.000")),
            next_review_date: ts("2024-01-02T12:00:00.000"),
        }
    }

    /// Scores 5, 5, 5, then 2.
    #[test]
    fn test_regime_sequence() {
        let now = ts("2024-01-01T12:00:00.000");

        let s1 = compute_next_state(&fresh(), 5, now).unwrap();
        assert_eq!(s1.interval, 1);
        assert_eq!(s1.consecutive_correct, 1);
        assert!(feq(s1.ease_factor, 2.6));
        assert_eq!(s1.review_count, 1);
        assert_eq!(s1.last_reviewed, Some(now));
        assert_eq!(s1.next_review_date, ts("2024-01-02T12:00:00.000"));

        let now = s1.next_review_date;
        let s2 = compute_next_state(&s1, 5, now).unwrap();
        assert_eq!(s2.interval, 6);
        assert_eq!(s2.consecutive_correct, 2);
        assert!(feq(s2.ease_factor, 2.7));
        assert_eq!(s2.review_count, 2);
        assert_eq!(s2.next_review_date, ts("2024-01-08T12:00:00.000"));

        let now = s2.next_review_date;
        let s3 = compute_next_state(&s2, 5, now).unwrap();
        assert_eq!(s3.interval, 16);
        assert_eq!(s3.consecutive_correct, 3);
        assert!(feq(s3.ease_factor, 2.8));
        assert_eq!(s3.review_count, 3);
        assert_eq!(s3.next_review_date, ts("2024-01-24T12:00:00.000"));

        let now = s3.next_review_date;
        let s4 = compute_next_state(&s3, 2, now).unwrap();
        assert_eq!(s4.interval, 1);
        assert_eq!(s4.consecutive_correct, 0);
        assert_eq!(s4.ease_factor, s3.ease_factor);
        assert_eq!(s4.review_count, 4);
        assert_eq!(s4.next_review_date, ts("2024-01-25T12:00:00.000"));
    }

    /// The established regime grows from the prior interval and prior ease.
    #[test]
    fn test_established_uses_prior_values() {
        let now = ts("2024-03-01T08:00:00.000");
        let next = compute_next_state(&state(10, 2.0, 4), 3, now).unwrap();
        assert_eq!(next.interval, 20);
        assert_eq!(next.consecutive_correct, 5);
        assert!(feq(next.ease_factor, 1.86));
    }

    /// 2.5 × 5 = 12.5 rounds away from zero.
    #[test]
    fn test_rounding_half_away_from_zero() {
        let now = ts("2024-03-01T08:00:00.000");
        let next = compute_next_state(&state(5, 2.5, 2), 4, now).unwrap();
        assert_eq!(next.interval, 13);
        let next = compute_next_state(&state(3, 1.5, 2), 4, now).unwrap();
        assert_eq!(next.interval, 5);
    }

    #[test]
    fn test_new_card_defaults_follow_first_recall() {
        let created_at = ts("2024-01-01T12:00:00.000");
        let initial = CardSchedulingState::new(CardDefaults::default(), created_at).unwrap();
        let next = compute_next_state(&initial, 4, ts("2024-01-02T12:00:00.000")).unwrap();
        assert_eq!(next.interval, 1);
        assert_eq!(next.consecutive_correct, 1);
        assert!(feq(next.ease_factor, 2.5));
    }

    #[test]
    fn test_ease_adjustment_per_score() {
        let expected = [(5, 2.6), (4, 2.5), (3, 2.36)];
        for (value, ease) in expected {
            assert!(feq(next_ease_factor(2.5, score(value)), ease));
        }
    }

    #[test]
    fn test_ease_has_no_ceiling() {
        let mut current = state(1, 2.5, 0);
        let now = ts("2024-01-01T00:00:00.000");
        for _ in 0..15 {
            current = compute_next_state(&current, 5, now).unwrap();
        }
        assert!(feq(current.ease_factor, 4.0));
    }

    #[test]
    fn test_floor_holds_under_repeated_failure() {
        let mut current = state(1, 1.3, 0);
        let now = ts("2024-01-01T00:00:00.000");
        for _ in 0..10 {
            current = compute_next_state(&current, 0, now).unwrap();
            assert_eq!(current.ease_factor, 1.3);
        }
    }

    #[test]
    fn test_floor_holds_for_weak_passes() {
        let now = ts("2024-01-01T00:00:00.000");
        let next = compute_next_state(&state(6, 1.3, 2), 3, now).unwrap();
        assert_eq!(next.ease_factor, 1.3);
        assert_eq!(next.interval, 8);
    }

    #[test]
    fn test_failure_resets_large_interval() {
        let now = ts("2024-01-01T00:00:00.000");
        let next = compute_next_state(&state(400, 2.9, 9), 1, now).unwrap();
        assert_eq!(next.interval, 1);
        assert_eq!(next.consecutive_correct, 0);
        assert_eq!(next.ease_factor, 2.9);
        assert_eq!(next.review_count, 10);
    }

    #[test]
    fn test_out_of_range_rejection() {
        let now = ts("2024-01-01T00:00:00.000");
        for value in [6, -1] {
            let current = fresh();
            let result = compute_next_state(&current, value, now);
            assert_eq!(result, Err(SchedulerError::InvalidPerformanceScore(value)));
            // Rejection is idempotent.
            let again = compute_next_state(&current, value, now);
            assert_eq!(again, result);
            assert_eq!(current, fresh());
        }
    }

    /// A bad score is reported even when the state is also corrupt.
    #[test]
    fn test_score_is_validated_first() {
        let now = ts("2024-01-01T00:00:00.000");
        let result = compute_next_state(&state(1, 0.5, 0), 9, now);
        assert_eq!(result, Err(SchedulerError::InvalidPerformanceScore(9)));
    }

    #[test]
    fn test_corrupt_ease() {
        let now = ts("2024-01-01T00:00:00.000");
        for ease_factor in [1.29, 0.0, -2.5, f64::NAN] {
            let result = compute_next_state(&state(1, ease_factor, 0), 5, now);
            assert!(matches!(
                result,
                Err(SchedulerError::CorruptState(Corruption::EaseBelowFloor { .. }))
            ));
        }
    }

    #[test]
    fn test_corrupt_missing_interval() {
        let now = ts("2024-01-01T00:00:00.000");
        let result = compute_next_state(&state(0, 2.5, 2), 5, now);
        assert_eq!(
            result,
            Err(SchedulerError::CorruptState(Corruption::MissingInterval {
                consecutive_correct: 2
            }))
        );
        // Failing still works: the interval is reset, not grown.
        assert!(compute_next_state(&state(0, 2.5, 2), 0, now).is_ok());
    }

    #[test]
    fn test_interval_overflow() {
        let now = ts("2024-01-01T00:00:00.000");
        let result = compute_next_state(&state(u32::MAX, 2.0, 5), 5, now);
        assert!(matches!(result, Err(SchedulerError::IntervalOverflow { .. })));
        // Representable as days, but past the end of the calendar.
        let result = compute_next_state(&state(1_000_000_000, 2.0, 5), 5, now);
        assert!(matches!(result, Err(SchedulerError::IntervalOverflow { .. })));
    }

    /// The review count is a version for stored state, so it never sticks.
    #[test]
    fn test_counter_overflow() {
        let now = ts("2024-01-01T00:00:00.000");
        let mut current = state(1, 2.5, 0);
        current.review_count = u32::MAX;
        for value in [0, 5] {
            let result = compute_next_state(&current, value, now);
            assert_eq!(result, Err(SchedulerError::CounterOverflow));
        }
        let mut current = state(10, 2.5, u32::MAX);
        current.review_count = 7;
        assert_eq!(compute_next_state(&current, 4, now), Err(SchedulerError::CounterOverflow));
        // A failure resets the streak instead of extending it.
        assert_eq!(compute_next_state(&current, 1, now).unwrap().consecutive_correct, 0);
    }

    #[test]
    fn test_classify() {
        assert_eq!(Regime::classify(score(2), 7), Regime::Failed);
        assert_eq!(Regime::classify(score(3), 0), Regime::FirstRecall);
        assert_eq!(Regime::classify(score(4), 1), Regime::SecondRecall);
        assert_eq!(Regime::classify(score(5), 2), Regime::Established);
        assert_eq!(Regime::classify(score(5), u32::MAX), Regime::Established);
    }

    /// Sweep a grid of reachable states and every valid score, checking the
    /// invariants of each transition.
    #[test]
    fn test_transition_invariants() {
        let now = ts("2024-06-01T10:30:00.000");
        for ease_step in 0..=54 {
            let ease_factor = 1.3 + (ease_step as f64) * 0.05;
            for consecutive_correct in 0..6 {
                for interval in [1, 2, 6, 15, 100, 365] {
                    let current = state(interval, ease_factor, consecutive_correct);
                    for value in 0..=5 {
                        let next = compute_next_state(&current, value, now).unwrap();
                        let again = compute_next_state(&current, value, now).unwrap();
                        assert_eq!(next.ease_factor.to_bits(), again.ease_factor.to_bits());
                        assert_eq!(next, again);

                        assert!(next.ease_factor >= MIN_EASE_FACTOR);
                        assert!(next.interval >= 1);
                        assert_eq!(next.review_count, current.review_count + 1);
                        assert_eq!(next.last_reviewed, Some(now));
                        assert_eq!(now.plus_days(next.interval), Some(next.next_review_date));
                        if value < 3 {
                            assert_eq!(next.interval, 1);
                            assert_eq!(next.consecutive_correct, 0);
                            assert_eq!(next.ease_factor, current.ease_factor);
                        } else {
                            assert_eq!(next.consecutive_correct, consecutive_correct + 1);
                        }
                    }
                }
            }
        }
    }
}
