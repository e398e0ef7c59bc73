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

//! sm2cards-core: Core library for the sm2cards spaced repetition scheduler.
//!
//! This library provides:
//! - The SM-2 review transition (`scheduler`)
//! - Card and scheduling state types
//! - A storage boundary with an in-memory implementation
//! - A review service that persists transitions without lost updates

pub mod config;
pub mod error;
pub mod review;
pub mod scheduler;
pub mod store;
pub mod types;

// Re-exports for convenience
pub use config::CardDefaults;
pub use config::Config;
pub use error::{ErrorReport, Fallible, SchedulerError, fail};
pub use review::review_card;
pub use scheduler::compute_next_state;
pub use store::{CardStore, MemoryStore, SwapOutcome};
pub use types::card::{Card, CardId, NewCard};
pub use types::score::PerformanceScore;
pub use types::state::CardSchedulingState;
pub use types::timestamp::Timestamp;
