//! Turn events, summaries and the replay log.
//!
//! The resolver reports everything that happened in a turn as an ordered list
//! of [`TurnEvent`]s. Together with a [`TurnSummary`] they form a [`TurnLog`],
//! and the ordered list of turn logs is the battle's full history. This is the
//! payload handed to persistence, settlement and replay consumers, so every
//! type here is serializable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{Action, Move};
use crate::creature::StatusKind;
use crate::squad::{PlayerId, Side};

// =============================================================================
// Card References
// =============================================================================

/// Identifies a creature within a battle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardRef {
    /// Squad the creature belongs to.
    pub side: Side,
    /// Position in the squad.
    pub slot: usize,
    /// Creature name, for readable logs.
    pub name: String,
}

impl CardRef {
    /// Creates a card reference.
    #[must_use]
    pub fn new(side: Side, slot: usize, name: impl Into<String>) -> Self {
        Self {
            side,
            slot,
            name: name.into(),
        }
    }
}

impl fmt::Display for CardRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}", self.side, self.slot, self.name)
    }
}

// =============================================================================
// Events
// =============================================================================

/// Something that happened during turn resolution.
///
/// Every variant carries a human-readable `message` for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TurnEvent {
    /// HP removed from a creature.
    Damage {
        /// Creature dealing damage.
        source: CardRef,
        /// Creature taking damage.
        target: CardRef,
        /// HP removed.
        value: u32,
        /// Ability name when the hit was a skill used off cooldown.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ability: Option<String>,
        /// Log line.
        message: String,
    },
    /// HP restored to a creature.
    Heal {
        /// Creature healing itself.
        target: CardRef,
        /// HP restored.
        value: u32,
        /// Log line.
        message: String,
    },
    /// A timed status was applied.
    StatusApply {
        /// Creature whose ability applied the status.
        source: CardRef,
        /// Creature receiving the status.
        target: CardRef,
        /// The status.
        status: StatusKind,
        /// Duration in turns.
        value: u32,
        /// Log line.
        message: String,
    },
    /// The active creature changed.
    Switch {
        /// Previously active creature, if any was standing.
        source: Option<CardRef>,
        /// Newly active creature.
        target: CardRef,
        /// True for switches forced by a faint.
        automatic: bool,
        /// Log line.
        message: String,
    },
    /// A creature was knocked out.
    Faint {
        /// The fainted creature.
        target: CardRef,
        /// Log line.
        message: String,
    },
}

impl TurnEvent {
    /// The log line.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Damage { message, .. }
            | Self::Heal { message, .. }
            | Self::StatusApply { message, .. }
            | Self::Switch { message, .. }
            | Self::Faint { message, .. } => message,
        }
    }

    /// The creature the event happened to.
    #[must_use]
    pub fn target(&self) -> &CardRef {
        match self {
            Self::Damage { target, .. }
            | Self::Heal { target, .. }
            | Self::StatusApply { target, .. }
            | Self::Switch { target, .. }
            | Self::Faint { target, .. } => target,
        }
    }

    /// The numeric value, where the event has one.
    #[must_use]
    pub const fn value(&self) -> Option<u32> {
        match self {
            Self::Damage { value, .. }
            | Self::Heal { value, .. }
            | Self::StatusApply { value, .. } => Some(*value),
            Self::Switch { .. } | Self::Faint { .. } => None,
        }
    }
}

// =============================================================================
// Summaries
// =============================================================================

/// Result of comparing the two non-switch actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriangleOutcome {
    /// Side A's action beat side B's.
    SideA,
    /// Side B's action beat side A's.
    SideB,
    /// Identical actions.
    Tie,
    /// At least one side switched, so no comparison was made.
    None,
}

impl TriangleOutcome {
    /// The winning side, if any.
    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::SideA => Some(Side::A),
            Self::SideB => Some(Side::B),
            Self::Tie | Self::None => None,
        }
    }
}

/// One side's view of a resolved turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSummary {
    /// The action that was resolved for this side.
    pub action: Action,
    /// Active creature before the turn.
    pub active_before: Option<CardRef>,
    /// Active creature after the turn, including automatic switches.
    pub active_after: Option<CardRef>,
    /// HP of `active_after`, floored at zero.
    pub remaining_hp: u32,
}

/// Per-turn summary produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSummary {
    /// Side A.
    pub side_a: SideSummary,
    /// Side B.
    pub side_b: SideSummary,
    /// Triangle comparison result.
    pub triangle: TriangleOutcome,
}

impl TurnSummary {
    /// Summary for one side.
    #[must_use]
    pub const fn side(&self, side: Side) -> &SideSummary {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }
}

// =============================================================================
// Turn Log
// =============================================================================

/// Recorded outcome of one resolved turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnLog {
    /// 1-based turn number.
    pub turn: u32,
    /// Move resolved for side A, annotations included.
    pub move_a: Move,
    /// Move resolved for side B, annotations included.
    pub move_b: Move,
    /// Active creatures, HP and triangle outcome.
    pub summary: TurnSummary,
    /// Events in the order they happened.
    pub events: Vec<TurnEvent>,
    /// Winner declared this turn, if any.
    pub winner: Option<PlayerId>,
}

impl TurnLog {
    /// Move resolved for one side.
    #[must_use]
    pub const fn move_for(&self, side: Side) -> &Move {
        match side {
            Side::A => &self.move_a,
            Side::B => &self.move_b,
        }
    }
}
