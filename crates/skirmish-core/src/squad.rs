//! Squads: the three creatures a player brings to a battle.
//!
//! A [`Squad`] owns exactly three [`Creature`]s in a fixed order. The order is
//! the original squad position and is what automatic switches use as their
//! tie-break. Which creature is fighting is not stored separately; it is the
//! one carrying the `ACTIVE` flag.
//!
//! # Example
//!
//! ```
//! use skirmish_core::creature::{Ability, Creature, EffectKind};
//! use skirmish_core::element::Element;
//! use skirmish_core::squad::Squad;
//!
//! let card = |name: &str| {
//!     Creature::new(name, Element::Fire, 40, 20, 30, 100, Ability::new("Flare", 35, EffectKind::Strike, 3))
//! };
//! let squad = Squad::new("alice", [card("a"), card("b"), card("c")]);
//!
//! assert_eq!(squad.active_index(), Some(0));
//! assert_eq!(squad.living_count(), 3);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::creature::{CardData, Creature};
use crate::error::SquadError;
use crate::rules::CombatRules;

/// Number of creatures in every squad.
pub const SQUAD_SIZE: usize = 3;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of the player (or agent address) owning a squad.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a new `PlayerId`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which side of the battle a squad fights on.
///
/// Side A wins speed ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// First squad.
    A,
    /// Second squad.
    B,
}

impl Side {
    /// Both sides, A first.
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// 0 for A, 1 for B.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

// =============================================================================
// Squad
// =============================================================================

/// A player's battle state: owner and three creatures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Squad {
    owner: PlayerId,
    creatures: [Creature; SQUAD_SIZE],
}

impl Squad {
    /// Creates a squad and activates its opening creature.
    ///
    /// Any creature already at 0 HP is marked fainted. The first creature that
    /// is still standing becomes active; every other `ACTIVE` flag is cleared.
    #[must_use]
    pub fn new(owner: impl Into<PlayerId>, creatures: [Creature; SQUAD_SIZE]) -> Self {
        let mut squad = Self {
            owner: owner.into(),
            creatures,
        };
        for creature in &mut squad.creatures {
            creature.set_active(false);
            if creature.hp() == 0 {
                creature.mark_fainted();
            }
        }
        if let Some(index) = squad.first_available() {
            squad.creatures[index].set_active(true);
        }
        squad
    }

    /// Builds a squad from upstream card data.
    ///
    /// # Errors
    ///
    /// Returns [`SquadError::WrongSize`] unless exactly three cards are given.
    pub fn from_cards(
        owner: impl Into<PlayerId>,
        cards: &[CardData],
        rules: &CombatRules,
    ) -> Result<Self, SquadError> {
        let creatures: Vec<Creature> = cards
            .iter()
            .map(|card| Creature::from_card(card, rules))
            .collect();
        let creatures: [Creature; SQUAD_SIZE] = creatures
            .try_into()
            .map_err(|rest: Vec<Creature>| SquadError::WrongSize(rest.len()))?;
        Ok(Self::new(owner, creatures))
    }

    /// The owning player.
    #[must_use]
    pub fn owner(&self) -> &PlayerId {
        &self.owner
    }

    /// All three creatures in squad order.
    #[must_use]
    pub fn creatures(&self) -> &[Creature; SQUAD_SIZE] {
        &self.creatures
    }

    pub(crate) fn creatures_mut(&mut self) -> &mut [Creature; SQUAD_SIZE] {
        &mut self.creatures
    }

    /// Creature at `index`, if in range.
    #[must_use]
    pub fn creature(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    /// Index of the active, non-fainted creature.
    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.creatures
            .iter()
            .position(|creature| creature.is_active() && !creature.is_fainted())
    }

    /// The active creature.
    #[must_use]
    pub fn active(&self) -> Option<&Creature> {
        self.active_index().map(|index| &self.creatures[index])
    }

    /// Benched creatures that can still be switched in, with their indices.
    pub fn bench(&self) -> impl Iterator<Item = (usize, &Creature)> {
        self.creatures
            .iter()
            .enumerate()
            .filter(|(_, creature)| !creature.is_active() && creature.is_available())
    }

    /// First non-fainted creature in squad order.
    #[must_use]
    pub fn first_available(&self) -> Option<usize> {
        self.creatures.iter().position(Creature::is_available)
    }

    /// Number of creatures not yet fainted.
    #[must_use]
    pub fn living_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.is_available()).count()
    }

    /// Returns true once every creature has fainted.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.creatures.iter().all(Creature::is_fainted)
    }

    /// Makes `index` the only active creature.
    ///
    /// Returns `false` (and changes nothing) if the index is out of range or
    /// the creature has fainted.
    pub(crate) fn activate(&mut self, index: usize) -> bool {
        match self.creatures.get(index) {
            Some(target) if target.is_available() => {
                for (i, creature) in self.creatures.iter_mut().enumerate() {
                    creature.set_active(i == index);
                }
                true
            }
            _ => false,
        }
    }
}
