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

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

/// Why the scheduler refused to compute a next state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchedulerError {
    /// The performance score was outside `[0, 5]`.
    InvalidPerformanceScore(i64),
    /// The prior state breaks an invariant no transition can produce.
    CorruptState(Corruption),
    /// The next interval or due date cannot be represented.
    IntervalOverflow { interval: f64 },
    /// The review count or streak is already at its maximum.
    CounterOverflow,
}

/// The broken invariant behind a [`SchedulerError::CorruptState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Corruption {
    /// The ease factor is below the floor, or NaN.
    EaseBelowFloor { ease_factor: f64 },
    /// A card on a passing streak has no prior interval to grow from.
    MissingInterval { consecutive_correct: u32 },
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::InvalidPerformanceScore(score) => {
                write!(f, "invalid performance score: {score} (expected 0 to 5)")
            }
            SchedulerError::CorruptState(Corruption::EaseBelowFloor { ease_factor }) => {
                write!(f, "corrupt scheduling state: ease factor {ease_factor} is below 1.3")
            }
            SchedulerError::CorruptState(Corruption::MissingInterval {
                consecutive_correct,
            }) => {
                write!(
                    f,
                    "corrupt scheduling state: interval is 0 after {consecutive_correct} consecutive correct reviews"
                )
            }
            SchedulerError::IntervalOverflow { interval } => {
                write!(f, "interval of {interval} days is out of range")
            }
            SchedulerError::CounterOverflow => {
                write!(f, "review counter is at its maximum")
            }
        }
    }
}

impl Error for SchedulerError {}

#[derive(Debug, PartialEq)]
pub struct ErrorReport {
    message: String,
}

impl ErrorReport {
    pub fn new(msg: impl Into<String>) -> Self {
        ErrorReport {
            message: msg.into(),
        }
    }
}

impl From<std::io::Error> for ErrorReport {
    fn from(value: std::io::Error) -> Self {
        ErrorReport {
            message: format!("I/O error: {value:#?}"),
        }
    }
}

impl From<serde_json::Error> for ErrorReport {
    fn from(value: serde_json::Error) -> Self {
        ErrorReport {
            message: format!("JSON error: {value:#?}"),
        }
    }
}

impl From<toml::de::Error> for ErrorReport {
    fn from(value: toml::de::Error) -> Self {
        ErrorReport {
            message: format!("Failed to parse TOML config: {value}"),
        }
    }
}

impl From<SchedulerError> for ErrorReport {
    fn from(value: SchedulerError) -> Self {
        ErrorReport {
            message: value.to_string(),
        }
    }
}

impl Display for ErrorReport {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "error: {}", self.message)
    }
}

impl Error for ErrorReport {}

pub type Fallible<T> = Result<T, ErrorReport>;

pub fn fail<T>(msg: impl Into<String>) -> Fallible<T> {
    Err(ErrorReport {
        message: msg.into(),
    })
}
