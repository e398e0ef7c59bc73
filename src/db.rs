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

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use sm2cards_core::Card;
use sm2cards_core::CardId;
use sm2cards_core::CardSchedulingState;
use sm2cards_core::CardStore;
use sm2cards_core::ErrorReport;
use sm2cards_core::Fallible;
use sm2cards_core::NewCard;
use sm2cards_core::SwapOutcome;
use sm2cards_core::Timestamp;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        subject TEXT NOT NULL,
        front TEXT NOT NULL,
        back TEXT NOT NULL,
        difficulty TEXT,
        created_at INTEGER NOT NULL,
        interval INTEGER NOT NULL,
        ease_factor REAL NOT NULL,
        consecutive_correct INTEGER NOT NULL,
        review_count INTEGER NOT NULL,
        last_reviewed INTEGER,
        next_review_date INTEGER NOT NULL
    );
    CREATE INDEX IF NOT EXISTS cards_next_review_date ON cards(next_review_date);
    CREATE INDEX IF NOT EXISTS cards_subject ON cards(subject);
";

const COLUMNS: &str = "id, subject, front, back, difficulty, created_at, interval, ease_factor, consecutive_correct, review_count, last_reviewed, next_review_date";

fn db_error(e: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("Database error: {e}"))
}

/// Timestamps are stored as epoch milliseconds so that SQL comparisons and
/// ordering agree with `Timestamp` at every year.
fn timestamp(millis: i64) -> Fallible<Timestamp> {
    Timestamp::from_millis(millis)
        .ok_or_else(|| ErrorReport::new(format!("invalid timestamp in database: {millis}")))
}

/// A card row as stored, before its timestamps are converted.
struct CardRow {
    id: i64,
    subject: String,
    front: String,
    back: String,
    difficulty: Option<String>,
    created_at: i64,
    interval: u32,
    ease_factor: f64,
    consecutive_correct: u32,
    review_count: u32,
    last_reviewed: Option<i64>,
    next_review_date: i64,
}

impl CardRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            subject: row.get(1)?,
            front: row.get(2)?,
            back: row.get(3)?,
            difficulty: row.get(4)?,
            created_at: row.get(5)?,
            interval: row.get(6)?,
            ease_factor: row.get(7)?,
            consecutive_correct: row.get(8)?,
            review_count: row.get(9)?,
            last_reviewed: row.get(10)?,
            next_review_date: row.get(11)?,
        })
    }

    fn into_card(self) -> Fallible<Card> {
        let last_reviewed = match self.last_reviewed {
            Some(millis) => Some(timestamp(millis)?),
            None => None,
        };
        Ok(Card {
            id: CardId::new(self.id),
            subject: self.subject,
            front: self.front,
            back: self.back,
            difficulty: self.difficulty,
            created_at: timestamp(self.created_at)?,
            state: CardSchedulingState {
                interval: self.interval,
                ease_factor: self.ease_factor,
                consecutive_correct: self.consecutive_correct,
                review_count: self.review_count,
                last_reviewed,
                next_review_date: timestamp(self.next_review_date)?,
            },
        })
    }
}

/// A SQLite-backed card store.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Fallible<Self> {
        log::debug!("Opening database at {}", path.display());
        let conn = Connection::open(path).map_err(db_error)?;
        Self::init(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn })
    }

    fn query_cards(&self, sql: &str, params: impl rusqlite::Params) -> Fallible<Vec<Card>> {
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let rows = stmt
            .query_map(params, CardRow::from_row)
            .map_err(db_error)?
            .collect::<rusqlite::Result<Vec<CardRow>>>()
            .map_err(db_error)?;
        rows.into_iter().map(CardRow::into_card).collect()
    }
}

impl CardStore for Database {
    fn insert(&self, card: NewCard, state: CardSchedulingState, now: Timestamp) -> Fallible<Card> {
        self.conn
            .execute(
                "INSERT INTO cards (subject, front, back, difficulty, created_at, interval, ease_factor, consecutive_correct, review_count, last_reviewed, next_review_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    card.subject,
                    card.front,
                    card.back,
                    card.difficulty,
                    now.to_millis(),
                    state.interval,
                    state.ease_factor,
                    state.consecutive_correct,
                    state.review_count,
                    state.last_reviewed.map(Timestamp::to_millis),
                    state.next_review_date.to_millis(),
                ],
            )
            .map_err(db_error)?;
        let id = CardId::new(self.conn.last_insert_rowid());
        let NewCard {
            subject,
            front,
            back,
            difficulty,
        } = card;
        Ok(Card {
            id,
            subject,
            front,
            back,
            difficulty,
            created_at: now,
            state,
        })
    }

    fn get(&self, id: CardId) -> Fallible<Option<Card>> {
        let sql = format!("SELECT {COLUMNS} FROM cards WHERE id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![id.into_inner()], CardRow::from_row)
            .optional()
            .map_err(db_error)?;
        row.map(CardRow::into_card).transpose()
    }

    fn list(&self, subject: Option<&str>) -> Fallible<Vec<Card>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM cards WHERE (?1 IS NULL OR subject = ?1) ORDER BY created_at DESC, id DESC"
        );
        self.query_cards(&sql, params![subject])
    }

    fn due(&self, now: Timestamp, subject: Option<&str>) -> Fallible<Vec<Card>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM cards WHERE next_review_date <= ?1 AND (?2 IS NULL OR subject = ?2) ORDER BY next_review_date ASC, id ASC"
        );
        self.query_cards(&sql, params![now.to_millis(), subject])
    }

    fn update_content(&self, id: CardId, card: NewCard) -> Fallible<bool> {
        let changed = self
            .conn
            .execute(
                "UPDATE cards SET subject = ?1, front = ?2, back = ?3, difficulty = ?4 WHERE id = ?5",
                params![
                    card.subject,
                    card.front,
                    card.back,
                    card.difficulty,
                    id.into_inner()
                ],
            )
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    fn delete(&self, id: CardId) -> Fallible<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM cards WHERE id = ?1", params![id.into_inner()])
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    fn swap_state(
        &self,
        id: CardId,
        expected_review_count: u32,
        next: &CardSchedulingState,
    ) -> Fallible<SwapOutcome> {
        let changed = self
            .conn
            .execute(
                "UPDATE cards
                 SET interval = ?1, ease_factor = ?2, consecutive_correct = ?3, review_count = ?4, last_reviewed = ?5, next_review_date = ?6
                 WHERE id = ?7 AND review_count = ?8",
                params![
                    next.interval,
                    next.ease_factor,
                    next.consecutive_correct,
                    next.review_count,
                    next.last_reviewed.map(Timestamp::to_millis),
                    next.next_review_date.to_millis(),
                    id.into_inner(),
                    expected_review_count,
                ],
            )
            .map_err(db_error)?;
        if changed > 0 {
            return Ok(SwapOutcome::Swapped);
        }
        let exists: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM cards WHERE id = ?1)",
                params![id.into_inner()],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        if exists {
            Ok(SwapOutcome::Conflict)
        } else {
            Ok(SwapOutcome::NotFound)
        }
    }
}
