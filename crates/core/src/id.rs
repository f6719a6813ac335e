// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Operation identifiers.
//!
//! Every queued mutation receives an id when it is submitted. Ids combine the
//! wall clock with a logical counter, so they stay unique and strictly
//! increasing even when several submissions land in the same millisecond or
//! the clock steps backwards.
//!
//! Format: `{wall_ms}-{counter}-{node_id}`
//!
//! Ordering rules:
//! 1. Higher wall_ms wins
//! 2. If wall_ms equal, higher counter wins
//! 3. If both equal, higher node_id wins

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Identifier assigned to a mutation at enqueue time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct OperationId {
    /// Wall clock time in milliseconds since Unix epoch.
    pub wall_ms: u64,
    /// Logical counter for ids minted in the same millisecond.
    pub counter: u32,
    /// Identifier of the device that minted the id.
    pub node_id: u32,
}

impl OperationId {
    /// Creates an id from its components.
    pub fn new(wall_ms: u64, counter: u32, node_id: u32) -> Self {
        OperationId {
            wall_ms,
            counter,
            node_id,
        }
    }

    /// Parses an id from its string representation.
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl Ord for OperationId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.wall_ms
            .cmp(&other.wall_ms)
            .then_with(|| self.counter.cmp(&other.counter))
            .then_with(|| self.node_id.cmp(&other.node_id))
    }
}

impl PartialOrd for OperationId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.wall_ms, self.counter, self.node_id)
    }
}

impl FromStr for OperationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3 {
            return Err(Error::InvalidOperationId(format!(
                "expected format 'wall_ms-counter-node_id', got '{s}'"
            )));
        }

        let wall_ms = parts[0].parse::<u64>().map_err(|_| {
            Error::InvalidOperationId(format!("invalid wall_ms '{}' in '{s}'", parts[0]))
        })?;
        let counter = parts[1].parse::<u32>().map_err(|_| {
            Error::InvalidOperationId(format!("invalid counter '{}' in '{s}'", parts[1]))
        })?;
        let node_id = parts[2].parse::<u32>().map_err(|_| {
            Error::InvalidOperationId(format!("invalid node_id '{}' in '{s}'", parts[2]))
        })?;

        Ok(OperationId::new(wall_ms, counter, node_id))
    }
}

impl From<OperationId> for String {
    fn from(id: OperationId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for OperationId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Source of wall clock time, injectable for tests.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Mints strictly increasing [`OperationId`]s.
pub struct IdGenerator {
    clock: Box<dyn ClockSource>,
    node_id: u32,
    /// Last issued (wall_ms, counter).
    last: Mutex<(u64, u32)>,
}

impl IdGenerator {
    /// Creates a generator backed by the system clock.
    pub fn new(node_id: u32) -> Self {
        Self::with_clock(SystemClock, node_id)
    }

    /// Creates a generator with a custom clock source.
    pub fn with_clock(clock: impl ClockSource + 'static, node_id: u32) -> Self {
        IdGenerator {
            clock: Box::new(clock),
            node_id,
            last: Mutex::new((0, 0)),
        }
    }

    /// Returns the node ID stamped into every id.
    pub fn node_id(&self) -> u32 {
        self.node_id
    }

    /// Issues the next id.
    pub fn next_id(&self) -> OperationId {
        let physical = self.clock.now_ms();
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        if physical > last.0 {
            *last = (physical, 0);
        } else if let Some(counter) = last.1.checked_add(1) {
            last.1 = counter;
        } else {
            // Counter exhausted within one millisecond: borrow the next one.
            *last = (last.0 + 1, 0);
        }

        OperationId::new(last.0, last.1, self.node_id)
    }

    /// Advances the generator past an id issued earlier (e.g. loaded from disk),
    /// so ids stay monotonic across restarts even if the clock went backwards.
    pub fn observe(&self, seen: &OperationId) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if (seen.wall_ms, seen.counter) > *last {
            *last = (seen.wall_ms, seen.counter);
        }
    }
}

/// Derives a stable-per-location node id from an arbitrary seed (e.g. a path).
pub fn node_id_from_seed(seed: impl Hash) -> u32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    (hasher.finish() & 0xFFFF_FFFF) as u32
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
