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

//! Applying a review to a stored card.

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::scheduler::schedule;
use crate::store::CardStore;
use crate::store::SwapOutcome;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::score::PerformanceScore;
use crate::types::timestamp::Timestamp;

/// How many times a review is retried after losing a race with another
/// review of the same card.
pub const MAX_REVIEW_ATTEMPTS: usize = 5;

/// Load a card, schedule it, and store the new state.
///
/// The score is validated before the store is touched. If another review
/// of the same card lands between the read and the write, the review is
/// recomputed from the fresh state.
pub fn review_card(
    store: &impl CardStore,
    id: CardId,
    performance: i64,
    now: Timestamp,
) -> Fallible<Card> {
    let score = PerformanceScore::try_from(performance)?;
    for attempt in 1..=MAX_REVIEW_ATTEMPTS {
        let mut card = match store.get(id)? {
            Some(card) => card,
            None => return fail(format!("card not found: {id}")),
        };
        let next = schedule(&card.state, score, now)?;
        match store.swap_state(id, card.state.review_count, &next)? {
            SwapOutcome::Swapped => {
                log::debug!(
                    "Reviewed card {id} with score {score}: next review in {} days",
                    next.interval
                );
                card.state = next;
                return Ok(card);
            }
            SwapOutcome::Conflict => {
                log::debug!("Concurrent review of card {id} (attempt {attempt}), retrying");
            }
            SwapOutcome::NotFound => return fail(format!("card not found: {id}")),
        }
    }
    Err(ErrorReport::new(format!(
        "card {id} was modified concurrently {MAX_REVIEW_ATTEMPTS} times, giving up"
    )))
}
