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

//! Scheduling constants and the defaults applied to new cards.

use serde::Deserialize;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::Fallible;

/// The ease factor given to a new card.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// The interval in days between creating a card and its first review.
pub const DEFAULT_INTERVAL_DAYS: u32 = 1;

/// No transition ever produces an ease factor below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// The lowest score that counts as a successful recall.
pub const PASSING_SCORE: u8 = 3;

/// The highest performance score.
pub const MAX_SCORE: u8 = 5;

/// The interval after a failed recall, and after the first passing one.
pub const FIRST_INTERVAL_DAYS: u32 = 1;

/// The interval after the second consecutive passing recall.
pub const SECOND_INTERVAL_DAYS: u32 = 6;

/// Scheduling parameters for newly created cards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardDefaults {
    pub ease_factor: f64,
    pub interval_days: u32,
}

impl Default for CardDefaults {
    fn default() -> Self {
        Self {
            ease_factor: DEFAULT_EASE_FACTOR,
            interval_days: DEFAULT_INTERVAL_DAYS,
        }
    }
}

impl CardDefaults {
    pub fn validate(self) -> Fallible<Self> {
        if self.ease_factor.is_nan() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(ErrorReport::new(format!(
                "default ease factor must be at least {MIN_EASE_FACTOR}, got {}",
                self.ease_factor
            )));
        }
        if self.interval_days < 1 {
            return Err(ErrorReport::new("default interval must be at least 1 day"));
        }
        Ok(self)
    }
}

/// The contents of a collection's config file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub defaults: CardDefaults,
}

impl Config {
    /// Parse and validate a TOML config.
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        config.defaults.validate()?;
        Ok(config)
    }
}
