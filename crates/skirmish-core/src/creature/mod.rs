//! Per-battle combat state of a single creature.
//!
//! A [`Creature`] is built once per battle from upstream card data (see
//! [`card`]) and then mutated in place by the
//! [`TurnResolver`](crate::resolver::TurnResolver) every turn. It is owned by
//! exactly one [`Squad`](crate::squad::Squad) and never shared across battles.
//!
//! # Invariants
//!
//! - `0 <= hp <= max_hp` after every mutation
//! - `ability.remaining_cooldown` never underflows and only grows when the
//!   ability is used
//! - a fainted creature is never active

pub mod card;

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::element::Element;

pub use card::CardData;

// =============================================================================
// Flags
// =============================================================================

bitflags! {
    /// Battle flags of a creature.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CreatureFlags: u8 {
        /// Currently fighting for its squad.
        const ACTIVE  = 1 << 0;
        /// Knocked out; can no longer act or be switched in.
        const FAINTED = 1 << 1;
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Card rarity. Carried for identity and replay only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    /// Common
    #[default]
    Common,
    /// Uncommon
    Uncommon,
    /// Rare
    Rare,
    /// Epic
    Epic,
    /// Legendary
    Legendary,
}

impl Rarity {
    /// Parses an upstream rarity tag, ignoring case.
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "common" => Some(Self::Common),
            "uncommon" => Some(Self::Uncommon),
            "rare" => Some(Self::Rare),
            "epic" => Some(Self::Epic),
            "legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

/// Base combat stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Attack stat; scales basic attacks.
    pub attack: u32,
    /// Defense stat; reduces incoming damage.
    pub defense: u32,
    /// Speed stat; higher acts first.
    pub speed: u32,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
}

// =============================================================================
// Ability & Status
// =============================================================================

/// Secondary effect of an ability, applied when the skill resolves off cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    /// Plain damage, no status.
    #[default]
    Strike,
    /// Burns the defender.
    Burn,
    /// Chills the defender.
    Chill,
    /// Shields the user.
    Shield,
}

impl EffectKind {
    /// Parses an upstream effect tag, ignoring case. `"damage"` is accepted as `Strike`.
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "strike" | "damage" | "none" => Some(Self::Strike),
            "burn" => Some(Self::Burn),
            "chill" | "freeze" => Some(Self::Chill),
            "shield" => Some(Self::Shield),
            _ => None,
        }
    }

    /// Status this effect applies, if any.
    #[must_use]
    pub const fn status(self) -> Option<StatusKind> {
        match self {
            Self::Strike => None,
            Self::Burn => Some(StatusKind::Burned),
            Self::Chill => Some(StatusKind::Chilled),
            Self::Shield => Some(StatusKind::Shielded),
        }
    }
}

/// The single ability a creature carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    /// Display name.
    pub name: String,
    /// Base damage of a skill hit.
    pub power: u32,
    /// Secondary effect.
    pub effect: EffectKind,
    /// Turns the ability is locked after use.
    pub cooldown: u32,
    /// Turns until the ability can be used again. Zero means ready.
    pub remaining_cooldown: u32,
}

impl Ability {
    /// Creates a ready ability.
    #[must_use]
    pub fn new(name: impl Into<String>, power: u32, effect: EffectKind, cooldown: u32) -> Self {
        Self {
            name: name.into(),
            power,
            effect,
            cooldown,
            remaining_cooldown: 0,
        }
    }

    /// Returns true if the ability is off cooldown.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.remaining_cooldown == 0
    }
}

/// Kind of timed status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Applied by `Burn` abilities.
    Burned,
    /// Applied by `Chill` abilities.
    Chilled,
    /// Applied by `Shield` abilities to their user.
    Shielded,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Burned => write!(f, "burned"),
            Self::Chilled => write!(f, "chilled"),
            Self::Shielded => write!(f, "shielded"),
        }
    }
}

/// A timed status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// What the status is.
    pub kind: StatusKind,
    /// Turns until it expires.
    pub turns_remaining: u32,
}

// =============================================================================
// Creature
// =============================================================================

/// Mutable per-battle representation of a creature card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Display name.
    pub name: String,
    /// Element tag.
    pub element: Element,
    /// Rarity tag.
    pub rarity: Rarity,
    /// Base stats, including current HP.
    pub stats: Stats,
    /// The creature's ability.
    pub ability: Ability,
    /// Timed status effects.
    pub statuses: Vec<StatusEffect>,
    /// Active / fainted flags.
    pub flags: CreatureFlags,
}

impl Creature {
    /// Creates a benched, healthy creature at full HP.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        element: Element,
        attack: u32,
        defense: u32,
        speed: u32,
        max_hp: u32,
        ability: Ability,
    ) -> Self {
        Self {
            name: name.into(),
            element,
            rarity: Rarity::Common,
            stats: Stats {
                attack,
                defense,
                speed,
                hp: max_hp,
                max_hp,
            },
            ability,
            statuses: Vec::new(),
            flags: CreatureFlags::empty(),
        }
    }

    /// Sets the rarity.
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.stats.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.stats.max_hp
    }

    /// Current HP as a percentage of max HP, in `[0, 100]`.
    #[must_use]
    pub fn hp_percent(&self) -> f64 {
        if self.stats.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.stats.hp) * 100.0 / f64::from(self.stats.max_hp)
    }

    /// Returns true if this creature is fighting for its squad.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.flags.contains(CreatureFlags::ACTIVE)
    }

    /// Returns true if this creature has been knocked out.
    #[must_use]
    pub const fn is_fainted(&self) -> bool {
        self.flags.contains(CreatureFlags::FAINTED)
    }

    /// Returns true if this creature can still fight (not marked fainted).
    #[must_use]
    pub const fn is_available(&self) -> bool {
        !self.is_fainted()
    }

    pub(crate) fn set_active(&mut self, active: bool) {
        self.flags.set(CreatureFlags::ACTIVE, active);
    }

    pub(crate) fn mark_fainted(&mut self) {
        self.flags.insert(CreatureFlags::FAINTED);
        self.flags.remove(CreatureFlags::ACTIVE);
    }

    /// Removes up to `amount` HP, clamping at zero. Returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.stats.hp);
        self.stats.hp -= lost;
        lost
    }

    /// Restores up to `amount` HP, clamping at max HP. Returns the HP actually gained.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let gained = amount.min(self.stats.max_hp - self.stats.hp.min(self.stats.max_hp));
        self.stats.hp += gained;
        gained
    }

    /// Puts the ability on its full cooldown.
    pub(crate) fn start_cooldown(&mut self) {
        self.ability.remaining_cooldown = self.ability.cooldown;
    }

    /// Applies a status, replacing any existing status of the same kind.
    pub(crate) fn apply_status(&mut self, kind: StatusKind, turns: u32) {
        self.statuses.retain(|status| status.kind != kind);
        if turns > 0 {
            self.statuses.push(StatusEffect {
                kind,
                turns_remaining: turns,
            });
        }
    }

    /// Returns true if the creature carries the given status.
    #[must_use]
    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.iter().any(|status| status.kind == kind)
    }

    /// End-of-turn tick: cooldown and status timers drop by one, floored at zero.
    ///
    /// Runs for every creature in both squads, benched ones included.
    pub(crate) fn tick(&mut self) {
        self.ability.remaining_cooldown = self.ability.remaining_cooldown.saturating_sub(1);
        for status in &mut self.statuses {
            status.turns_remaining = status.turns_remaining.saturating_sub(1);
        }
        self.statuses.retain(|status| status.turns_remaining > 0);
    }
}

impl fmt::Display for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}/{} HP)",
            self.name, self.element, self.stats.hp, self.stats.max_hp
        )
    }
}
