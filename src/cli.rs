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

use clap::Parser;
use serde::Serialize;
use sm2cards_core::Card;
use sm2cards_core::CardId;
use sm2cards_core::Fallible;
use sm2cards_core::NewCard;
use sm2cards_core::Timestamp;

use crate::cmd::cards::CardEdit;
use crate::cmd::cards::add_card;
use crate::cmd::cards::delete_card;
use crate::cmd::cards::edit_card;
use crate::cmd::cards::list_cards;
use crate::cmd::cards::show_card;
use crate::cmd::review::due_cards;
use crate::cmd::review::review;
use crate::collection::Collection;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Add a card. Its first review is due after the default interval.
    Add {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        #[arg(long)]
        subject: String,
        #[arg(long)]
        front: String,
        #[arg(long)]
        back: String,
        /// A free-form difficulty label, such as "hard".
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Print a card and its scheduling state.
    Show {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        id: CardId,
    },
    /// List all cards, newest first.
    List {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        /// Only list cards from this subject.
        #[arg(long)]
        subject: Option<String>,
    },
    /// List the cards due for review now, earliest first.
    Due {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        /// Only list cards from this subject.
        #[arg(long)]
        subject: Option<String>,
    },
    /// Record a review and reschedule the card.
    Review {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        id: CardId,
        /// Recall quality, from 0 (total failure) to 5 (perfect recall).
        #[arg(allow_negative_numbers = true)]
        performance: i64,
    },
    /// Change a card's subject, content, or difficulty label. Scheduling is left untouched.
    Edit {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        id: CardId,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long)]
        difficulty: Option<String>,
    },
    /// Delete a card.
    Delete {
        /// Path to the card database. Default is sm2cards.db.
        #[arg(long)]
        db: Option<String>,
        id: CardId,
    },
}

#[derive(Serialize)]
struct Listing {
    count: usize,
    cards: Vec<Card>,
}

impl From<Vec<Card>> for Listing {
    fn from(cards: Vec<Card>) -> Self {
        Self {
            count: cards.len(),
            cards,
        }
    }
}

fn print_json(value: &impl Serialize) -> Fallible<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    let now = Timestamp::now();
    match cli {
        Command::Add {
            db,
            subject,
            front,
            back,
            difficulty,
        } => {
            let collection = Collection::open(db)?;
            let card = NewCard {
                subject,
                front,
                back,
                difficulty,
            };
            print_json(&add_card(&collection, card, now)?)
        }
        Command::Show { db, id } => {
            let collection = Collection::open(db)?;
            print_json(&show_card(&collection, id)?)
        }
        Command::List { db, subject } => {
            let collection = Collection::open(db)?;
            let cards = list_cards(&collection, subject.as_deref())?;
            print_json(&Listing::from(cards))
        }
        Command::Due { db, subject } => {
            let collection = Collection::open(db)?;
            let cards = due_cards(&collection, subject.as_deref(), now)?;
            print_json(&Listing::from(cards))
        }
        Command::Review {
            db,
            id,
            performance,
        } => {
            let collection = Collection::open(db)?;
            print_json(&review(&collection, id, performance, now)?)
        }
        Command::Edit {
            db,
            id,
            subject,
            front,
            back,
            difficulty,
        } => {
            let collection = Collection::open(db)?;
            let edit = CardEdit {
                subject,
                front,
                back,
                difficulty,
            };
            print_json(&edit_card(&collection, id, edit)?)
        }
        Command::Delete { db, id } => {
            let collection = Collection::open(db)?;
            delete_card(&collection, id)?;
            println!("Deleted card {id}.");
            Ok(())
        }
    }
}
