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

use std::fs::read_to_string;
use std::path::PathBuf;

use sm2cards_core::Config;
use sm2cards_core::Fallible;

use crate::db::Database;

pub const DEFAULT_DATABASE: &str = "sm2cards.db";

/// The config file is looked up next to the database.
pub const CONFIG_FILE: &str = "sm2cards.toml";

/// A card database and the config that applies to it.
pub struct Collection {
    pub db: Database,
    pub config: Config,
}

impl Collection {
    pub fn open(db_path: Option<String>) -> Fallible<Self> {
        let db_path = PathBuf::from(db_path.unwrap_or_else(|| DEFAULT_DATABASE.to_string()));
        let config_path = match db_path.parent() {
            Some(dir) => dir.join(CONFIG_FILE),
            None => PathBuf::from(CONFIG_FILE),
        };
        let config = if config_path.exists() {
            log::debug!("Loading config from {}", config_path.display());
            Config::parse(&read_to_string(&config_path)?)?
        } else {
            Config::default()
        };
        let db = Database::open(&db_path)?;
        Ok(Self { db, config })
    }
}
