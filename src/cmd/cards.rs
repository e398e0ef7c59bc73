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

use sm2cards_core::Card;
use sm2cards_core::CardId;
use sm2cards_core::CardSchedulingState;
use sm2cards_core::CardStore;
use sm2cards_core::Fallible;
use sm2cards_core::NewCard;
use sm2cards_core::Timestamp;
use sm2cards_core::fail;

use crate::collection::Collection;

/// Fields to change on an existing card. `None` keeps the current value.
#[derive(Default)]
pub struct CardEdit {
    pub subject: Option<String>,
    pub front: Option<String>,
    pub back: Option<String>,
    pub difficulty: Option<String>,
}

pub fn add_card(collection: &Collection, card: NewCard, now: Timestamp) -> Fallible<Card> {
    let state = CardSchedulingState::new(collection.config.defaults, now)?;
    let card = collection.db.insert(card, state, now)?;
    log::debug!("Added card {} due at {}", card.id, card.state.next_review_date);
    Ok(card)
}

pub fn show_card(collection: &Collection, id: CardId) -> Fallible<Card> {
    match collection.db.get(id)? {
        Some(card) => Ok(card),
        None => fail(format!("card not found: {id}")),
    }
}

pub fn list_cards(collection: &Collection, subject: Option<&str>) -> Fallible<Vec<Card>> {
    collection.db.list(subject)
}

pub fn edit_card(collection: &Collection, id: CardId, edit: CardEdit) -> Fallible<Card> {
    let CardEdit {
        subject,
        front,
        back,
        difficulty,
    } = edit;
    if subject.is_none() && front.is_none() && back.is_none() && difficulty.is_none() {
        return fail("nothing to edit: pass --subject, --front, --back, or --difficulty");
    }
    let card = show_card(collection, id)?;
    let content = NewCard {
        subject: subject.unwrap_or(card.subject),
        front: front.unwrap_or(card.front),
        back: back.unwrap_or(card.back),
        difficulty: difficulty.or(card.difficulty),
    };
    if !collection.db.update_content(id, content)? {
        return fail(format!("card not found: {id}"));
    }
    show_card(collection, id)
}

pub fn delete_card(collection: &Collection, id: CardId) -> Fallible<()> {
    if !collection.db.delete(id)? {
        return fail(format!("card not found: {id}"));
    }
    log::debug!("Deleted card {id}");
    Ok(())
}
