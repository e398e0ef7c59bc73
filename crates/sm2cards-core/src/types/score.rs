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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Deserialize;
use serde::Serialize;

use crate::config::MAX_SCORE;
use crate::config::PASSING_SCORE;
use crate::error::SchedulerError;

/// A learner's self-rated recall quality, from 0 (total failure) to 5
/// (perfect recall).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PerformanceScore(u8);

impl PerformanceScore {
    /// Whether this score counts as a successful recall.
    pub fn is_passing(self) -> bool {
        self.0 >= PASSING_SCORE
    }

    /// How far this score falls short of a perfect one.
    pub fn shortfall(self) -> f64 {
        f64::from(MAX_SCORE - self.0)
    }
}

impl TryFrom<i64> for PerformanceScore {
    type Error = SchedulerError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(score) if score <= MAX_SCORE => Ok(PerformanceScore(score)),
            _ => Err(SchedulerError::InvalidPerformanceScore(value)),
        }
    }
}

impl From<PerformanceScore> for i64 {
    fn from(score: PerformanceScore) -> i64 {
        i64::from(score.0)
    }
}

impl Display for PerformanceScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
