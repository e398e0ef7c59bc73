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

//! The persistence boundary the review service talks to.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::card::NewCard;
use crate::types::state::CardSchedulingState;
use crate::types::timestamp::Timestamp;

/// The result of a conditional state write.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwapOutcome {
    /// The new state was written.
    Swapped,
    /// Another review was applied first; nothing was written.
    Conflict,
    /// The card does not exist.
    NotFound,
}

/// Card storage keyed by card id.
///
/// `swap_state` must be atomic with respect to every other write to the
/// same card.
pub trait CardStore {
    fn insert(&self, card: NewCard, state: CardSchedulingState, now: Timestamp) -> Fallible<Card>;

    fn get(&self, id: CardId) -> Fallible<Option<Card>>;

    /// All cards, newest first, optionally restricted to one subject.
    fn list(&self, subject: Option<&str>) -> Fallible<Vec<Card>>;

    /// Cards due at `now`, earliest first, optionally restricted to one
    /// subject.
    fn due(&self, now: Timestamp, subject: Option<&str>) -> Fallible<Vec<Card>>;

    /// Replace a card's content. Returns false if the card does not exist.
    fn update_content(&self, id: CardId, card: NewCard) -> Fallible<bool>;

    /// Returns false if the card does not exist.
    fn delete(&self, id: CardId) -> Fallible<bool>;

    /// Write `next` only if the stored review count is still
    /// `expected_review_count`.
    fn swap_state(
        &self,
        id: CardId,
        expected_review_count: u32,
        next: &CardSchedulingState,
    ) -> Fallible<SwapOutcome>;
}

/// A card store that lives in memory. Safe to share between threads.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i64,
    cards: BTreeMap<CardId, Card>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Fallible<MutexGuard<'_, MemoryInner>> {
        self.inner
            .lock()
            .map_err(|_| ErrorReport::new("card store lock poisoned"))
    }
}

fn in_subject(card: &Card, subject: Option<&str>) -> bool {
    subject.is_none_or(|s| card.subject == s)
}

impl CardStore for MemoryStore {
    fn insert(&self, card: NewCard, state: CardSchedulingState, now: Timestamp) -> Fallible<Card> {
        let mut inner = self.lock()?;
        inner.next_id += 1;
        let id = CardId::new(inner.next_id);
        let NewCard {
            subject,
            front,
            back,
            difficulty,
        } = card;
        let card = Card {
            id,
            subject,
            front,
            back,
            difficulty,
            created_at: now,
            state,
        };
        inner.cards.insert(id, card.clone());
        Ok(card)
    }

    fn get(&self, id: CardId) -> Fallible<Option<Card>> {
        Ok(self.lock()?.cards.get(&id).cloned())
    }

    fn list(&self, subject: Option<&str>) -> Fallible<Vec<Card>> {
        let inner = self.lock()?;
        let mut cards: Vec<Card> = inner
            .cards
            .values()
            .filter(|card| in_subject(card, subject))
            .cloned()
            .collect();
        cards.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(cards)
    }

    fn due(&self, now: Timestamp, subject: Option<&str>) -> Fallible<Vec<Card>> {
        let inner = self.lock()?;
        let mut cards: Vec<Card> = inner
            .cards
            .values()
            .filter(|card| in_subject(card, subject) && card.state.is_due(now))
            .cloned()
            .collect();
        cards.sort_by(|a, b| {
            a.state
                .next_review_date
                .cmp(&b.state.next_review_date)
                .then(a.id.cmp(&b.id))
        });
        Ok(cards)
    }

    fn update_content(&self, id: CardId, card: NewCard) -> Fallible<bool> {
        let mut inner = self.lock()?;
        match inner.cards.get_mut(&id) {
            Some(stored) => {
                stored.subject = card.subject;
                stored.front = card.front;
                stored.back = card.back;
                stored.difficulty = card.difficulty;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: CardId) -> Fallible<bool> {
        Ok(self.lock()?.cards.remove(&id).is_some())
    }

    fn swap_state(
        &self,
        id: CardId,
        expected_review_count: u32,
        next: &CardSchedulingState,
    ) -> Fallible<SwapOutcome> {
        let mut inner = self.lock()?;
        let outcome = match inner.cards.get_mut(&id) {
            None => SwapOutcome::NotFound,
            Some(card) if card.state.review_count != expected_review_count => {
                SwapOutcome::Conflict
            }
            Some(card) => {
                card.state = *next;
                SwapOutcome::Swapped
            }
        };
        Ok(outcome)
    }
}
