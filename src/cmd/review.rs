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
use sm2cards_core::CardStore;
use sm2cards_core::Fallible;
use sm2cards_core::Timestamp;
use sm2cards_core::review_card;

use crate::collection::Collection;

pub fn review(
    collection: &Collection,
    id: CardId,
    performance: i64,
    now: Timestamp,
) -> Fallible<Card> {
    review_card(&collection.db, id, performance, now)
}

pub fn due_cards(
    collection: &Collection,
    subject: Option<&str>,
    now: Timestamp,
) -> Fallible<Vec<Card>> {
    collection.db.due(now, subject)
}
