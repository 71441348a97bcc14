//! Player stats: the scalar state mutated by card choices.

use serde::{Deserialize, Serialize};

/// The closed set of player stats.
///
/// Content data names stats by these variant names (`"Reputation"` etc.), so
/// an unknown stat in a data file is rejected by serde at load time rather
/// than ever reaching the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Reputation,
    Money,
    Health,
}

/// Inclusive bounds for a clamped scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatRange {
    pub min: i32,
    pub max: i32,
}

impl StatRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Clamp a value into this range.
    pub fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }

    /// Whether the range is well-formed (`min <= max`).
    pub fn is_valid(&self) -> bool {
        self.min <= self.max
    }
}

/// The player's scalar state. Each stat is independently clamped to its
/// configured range; mutation happens only through [`PlayerStats::apply`],
/// driven by choice stat-modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub reputation: i32,
    pub money: i32,
    pub health: i32,
}

impl PlayerStats {
    pub fn new(reputation: i32, money: i32, health: i32) -> Self {
        Self {
            reputation,
            money,
            health,
        }
    }

    /// Read a stat by discriminant.
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Reputation => self.reputation,
            Stat::Money => self.money,
            Stat::Health => self.health,
        }
    }

    /// Add `delta` to a stat, clamped to `range`.
    pub fn apply(&mut self, stat: Stat, delta: i32, range: &StatRange) {
        let slot = match stat {
            Stat::Reputation => &mut self.reputation,
            Stat::Money => &mut self.money,
            Stat::Health => &mut self.health,
        };
        *slot = range.clamp(*slot + delta);
    }
}
