//! What one side of a battle is allowed to see.
//!
//! A [`BattleView`] borrows the viewer's own squad in full. Of the opponent it
//! exposes only what a player across the table could observe: the active
//! creature's public card and how many creatures are still standing. Bench HP,
//! bench identities and cooldowns stay hidden.
//!
//! Views are read-only, so both sides' views of one battle can be handed to
//! decision providers running in parallel.

use serde::{Deserialize, Serialize};

use crate::battle::Battle;
use crate::creature::Creature;
use crate::element::Element;
use crate::squad::{PlayerId, Side, Squad};

/// The opponent's active creature as seen from across the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleCard {
    /// Squad position.
    pub slot: usize,
    /// Display name.
    pub name: String,
    /// Element tag.
    pub element: Element,
    /// Attack stat.
    pub attack: u32,
    /// Defense stat.
    pub defense: u32,
    /// Speed stat.
    pub speed: u32,
    /// Current HP.
    pub hp: u32,
    /// Maximum HP.
    pub max_hp: u32,
}

impl VisibleCard {
    fn from_creature(slot: usize, creature: &Creature) -> Self {
        Self {
            slot,
            name: creature.name.clone(),
            element: creature.element,
            attack: creature.stats.attack,
            defense: creature.stats.defense,
            speed: creature.stats.speed,
            hp: creature.hp(),
            max_hp: creature.max_hp(),
        }
    }

    /// Current HP as a percentage of max HP.
    #[must_use]
    pub fn hp_percent(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        f64::from(self.hp) * 100.0 / f64::from(self.max_hp)
    }
}

/// Public information about the opposing squad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentView {
    /// Opposing player.
    pub owner: PlayerId,
    /// Their active creature, if any is standing.
    pub active: Option<VisibleCard>,
    /// Creatures they have not lost yet.
    pub living: usize,
}

impl OpponentView {
    /// Builds the public view of a squad.
    #[must_use]
    pub fn of(squad: &Squad) -> Self {
        Self {
            owner: squad.owner().clone(),
            active: squad
                .active_index()
                .map(|slot| VisibleCard::from_creature(slot, &squad.creatures()[slot])),
            living: squad.living_count(),
        }
    }
}

/// Everything a decision provider receives for one turn.
#[derive(Debug, Clone)]
pub struct BattleView<'a> {
    /// Current 1-based turn number.
    pub turn: u32,
    /// The viewer's side.
    pub side: Side,
    /// The viewer's own squad, in full.
    pub own: &'a Squad,
    /// The opposing squad, restricted to public information.
    pub opponent: OpponentView,
}

impl<'a> BattleView<'a> {
    /// Builds a view from explicit squads.
    #[must_use]
    pub fn new(turn: u32, side: Side, own: &'a Squad, opponent: &Squad) -> Self {
        Self {
            turn,
            side,
            own,
            opponent: OpponentView::of(opponent),
        }
    }

    /// The view `side` has of `battle`.
    #[must_use]
    pub fn for_side(battle: &'a Battle, side: Side) -> Self {
        Self::new(
            battle.turn(),
            side,
            battle.squad(side),
            battle.squad(side.opponent()),
        )
    }

    /// The viewer's active creature.
    #[must_use]
    pub fn own_active(&self) -> Option<&'a Creature> {
        self.own.active()
    }

    /// The opponent's active creature.
    #[must_use]
    pub fn opponent_active(&self) -> Option<&VisibleCard> {
        self.opponent.active.as_ref()
    }
}
