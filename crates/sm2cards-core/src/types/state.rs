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

use serde::Deserialize;
use serde::Serialize;

use crate::config::CardDefaults;
use crate::error::SchedulerError;
use crate::types::timestamp::Timestamp;

/// Per-card scheduling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardSchedulingState {
    /// Days between the last review and the next one. Zero if the card has
    /// never been scheduled by a review.
    pub interval: u32,
    /// Multiplier controlling interval growth. Never below 1.3.
    pub ease_factor: f64,
    /// The number of passing reviews since the last failure.
    pub consecutive_correct: u32,
    /// The number of reviews ever applied to this card.
    pub review_count: u32,
    /// When the card was last reviewed, if ever.
    pub last_reviewed: Option<Timestamp>,
    /// When the card is next due.
    pub next_review_date: Timestamp,
}

impl CardSchedulingState {
    /// The state of a card created at `created_at`.
    pub fn new(defaults: CardDefaults, created_at: Timestamp) -> Result<Self, SchedulerError> {
        let next_review_date =
            created_at
                .plus_days(defaults.interval_days)
                .ok_or(SchedulerError::IntervalOverflow {
                    interval: f64::from(defaults.interval_days),
                })?;
        Ok(Self {
            interval: defaults.interval_days,
            ease_factor: defaults.ease_factor,
            consecutive_correct: 0,
            review_count: 0,
            last_reviewed: None,
            next_review_date,
        })
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.next_review_date <= now
    }
}
