//! Turn resolution: two moves in, events and mutated squads out.
//!
//! The [`TurnResolver`] is the write phase of a battle. Given both squads and
//! both sides' moves it mutates the creatures in place and reports what
//! happened. It is deterministic: no randomness, no I/O, no hidden state beyond
//! the [`CombatRules`] it was built with.
//!
//! # Resolution Order
//!
//! 1. **Switches** for both sides, before any damage
//! 2. **Re-read** the active creatures
//! 3. **Triangle** comparison of the two non-switch actions
//! 4. **Order** by speed, side A on ties; a knockout stops the second actor
//! 5. **Actions**: guard heals, attack/skill deal damage, skills start cooldown
//! 6. **Tick** cooldowns and statuses of *every* creature, benched included
//! 7. **Faint** check
//! 8. **Auto-switch** to the first standing creature in squad order
//! 9. **Winner** check; both squads wiped is a draw
//! 10. **Summary**
//!
//! # Invariants
//!
//! - Every creature's HP stays within `[0, max_hp]`
//! - After resolution each squad has exactly one active creature unless it is
//!   wiped out
//! - Resolution never fails: whatever the input, a well-formed
//!   [`TurnSummary`] comes back
//!
//! # Example
//!
//! ```
//! use skirmish_core::action::Move;
//! use skirmish_core::creature::{Ability, Creature, EffectKind};
//! use skirmish_core::element::Element;
//! use skirmish_core::resolver::TurnResolver;
//! use skirmish_core::rules::CombatRules;
//! use skirmish_core::squad::Squad;
//!
//! let make = |element| {
//!     Creature::new("c", element, 45, 30, 30, 200, Ability::new("a", 40, EffectKind::Strike, 3))
//! };
//! let mut a = Squad::new("alice", [make(Element::Fire), make(Element::Fire), make(Element::Fire)]);
//! let mut b = Squad::new("bob", [make(Element::Earth), make(Element::Earth), make(Element::Earth)]);
//!
//! let resolver = TurnResolver::new(CombatRules::default());
//! let resolution = resolver.resolve(&mut a, &mut b, &Move::attack(), &Move::attack());
//!
//! // round(45 * 0.8 * 1.5 - 30 * 0.5) = 39
//! assert_eq!(b.active().unwrap().hp(), 200 - 39);
//! assert!(resolution.winner.is_none());
//! ```

pub mod damage;
pub mod triangle;

use crate::action::{Action, ActionKind, Move};
use crate::creature::StatusKind;
use crate::event::{CardRef, SideSummary, TurnEvent, TurnSummary};
use crate::rules::CombatRules;
use crate::squad::{PlayerId, Side, Squad};

use self::damage::HitKind;

/// Everything a resolved turn produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// Events in the order they happened.
    pub events: Vec<TurnEvent>,
    /// Owner of the surviving squad, when exactly one squad was wiped out.
    pub winner: Option<PlayerId>,
    /// Per-side summary.
    pub summary: TurnSummary,
}

impl Resolution {
    /// Returns true if a winner was declared.
    #[must_use]
    pub const fn has_winner(&self) -> bool {
        self.winner.is_some()
    }
}

/// Deterministic turn resolver.
#[derive(Debug, Clone, Default)]
pub struct TurnResolver {
    rules: CombatRules,
}

impl TurnResolver {
    /// Creates a resolver bound to a rule set.
    #[must_use]
    pub fn new(rules: CombatRules) -> Self {
        Self { rules }
    }

    /// The rules this resolver applies.
    #[must_use]
    pub const fn rules(&self) -> &CombatRules {
        &self.rules
    }

    /// Resolves one turn, mutating both squads in place.
    ///
    /// Callers must not resolve two turns of the same battle concurrently; the
    /// `&mut` borrows enforce that within a process.
    pub fn resolve(
        &self,
        squad_a: &mut Squad,
        squad_b: &mut Squad,
        move_a: &Move,
        move_b: &Move,
    ) -> Resolution {
        let mut squads = [squad_a, squad_b];
        let actions = [move_a.action, move_b.action];
        let mut events = Vec::new();

        let active_before = [
            active_ref(squads[0], Side::A),
            active_ref(squads[1], Side::B),
        ];

        // 1. Switches, both sides, before any damage.
        for side in Side::BOTH {
            if let Action::Switch(target) = actions[side.index()] {
                Self::apply_switch(squads[side.index()], side, target, &mut events);
            }
        }

        // 2-3. Active creatures are re-read from here on; compare actions.
        let triangle = triangle::compare(actions[0], actions[1]);

        // 4-5. Speed order, then act.
        let order = Self::action_order(&squads);
        tracing::debug!(?triangle, first = %order[0], "resolving actions");

        for (position, side) in order.into_iter().enumerate() {
            let kind = actions[side.index()].kind();
            let won_triangle = triangle.winner() == Some(side);
            let knocked_out = self.act(&mut squads, side, kind, won_triangle, &mut events);
            if position == 0 && knocked_out {
                tracing::debug!(side = %side.opponent(), "second actor knocked out before acting");
                break;
            }
        }

        // 6. Tick every creature on both squads, benched ones included.
        for squad in &mut squads {
            for creature in squad.creatures_mut() {
                creature.tick();
            }
        }

        // Actives still standing before the faint check; a knocked-out one is the auto-switch source.
        let standing = [squads[0].active_index(), squads[1].active_index()];

        // 7. Faint check.
        for side in Side::BOTH {
            Self::faint_check(squads[side.index()], side, &mut events);
        }

        // 8. Auto-switch.
        for side in Side::BOTH {
            Self::auto_switch(squads[side.index()], side, standing[side.index()], &mut events);
        }

        // 9. Winner.
        let winner = match (squads[0].is_defeated(), squads[1].is_defeated()) {
            (true, false) => Some(squads[1].owner().clone()),
            (false, true) => Some(squads[0].owner().clone()),
            (true, true) => {
                tracing::warn!("both squads wiped out in the same turn, declaring a draw");
                None
            }
            (false, false) => None,
        };

        // 10. Summary.
        let summary = TurnSummary {
            side_a: side_summary(squads[0], Side::A, actions[0], active_before[0].clone()),
            side_b: side_summary(squads[1], Side::B, actions[1], active_before[1].clone()),
            triangle,
        };

        Resolution {
            events,
            winner,
            summary,
        }
    }

    /// Speed order of the two sides. Higher speed first; side A wins ties.
    fn action_order(squads: &[&mut Squad; 2]) -> [Side; 2] {
        let speed = |side: Side| {
            squads[side.index()]
                .active()
                .map_or(0, |creature| creature.stats.speed)
        };
        if speed(Side::B) > speed(Side::A) {
            [Side::B, Side::A]
        } else {
            [Side::A, Side::B]
        }
    }

    fn apply_switch(squad: &mut Squad, side: Side, target: usize, events: &mut Vec<TurnEvent>) {
        let source = active_ref(squad, side);
        if !squad.activate(target) {
            tracing::warn!(%side, target, "switch target unavailable at resolution, ignoring switch");
            return;
        }
        let Some(target_ref) = active_ref(squad, side) else {
            return;
        };
        let message = match &source {
            Some(from) => format!("{} switches out {} for {}", squad.owner(), from.name, target_ref.name),
            None => format!("{} sends in {}", squad.owner(), target_ref.name),
        };
        events.push(TurnEvent::Switch {
            source,
            target: target_ref,
            automatic: false,
            message,
        });
    }

    /// Performs one side's action. Returns true if it left the opposing active creature at 0 HP.
    fn act(
        &self,
        squads: &mut [&mut Squad; 2],
        side: Side,
        kind: ActionKind,
        won_triangle: bool,
        events: &mut Vec<TurnEvent>,
    ) -> bool {
        let own = side.index();
        let opp = side.opponent().index();

        match kind {
            ActionKind::Switch => false,
            ActionKind::Guard => {
                let Some(slot) = squads[own].active_index() else {
                    return false;
                };
                let amount = {
                    let creature = &squads[own].creatures()[slot];
                    damage::guard_heal(creature, &self.rules)
                };
                let creature = &mut squads[own].creatures_mut()[slot];
                let healed = creature.heal(amount);
                events.push(TurnEvent::Heal {
                    target: CardRef::new(side, slot, creature.name.clone()),
                    value: healed,
                    message: format!("{} guards and recovers {healed} HP", creature.name),
                });
                false
            }
            ActionKind::Attack | ActionKind::Skill => {
                let (Some(attacker_slot), Some(defender_slot)) =
                    (squads[own].active_index(), squads[opp].active_index())
                else {
                    return false;
                };

                let hit = {
                    let attacker = &squads[own].creatures()[attacker_slot];
                    let defender = &squads[opp].creatures()[defender_slot];
                    damage::compute_hit(attacker, defender, kind, won_triangle, &self.rules)
                };

                let (attacker_ref, ability) = {
                    let attacker = &mut squads[own].creatures_mut()[attacker_slot];
                    let ability = (hit.kind == HitKind::Skill).then(|| attacker.ability.clone());
                    if ability.is_some() {
                        attacker.start_cooldown();
                    }
                    (CardRef::new(side, attacker_slot, attacker.name.clone()), ability)
                };

                let defender = &mut squads[opp].creatures_mut()[defender_slot];
                let dealt = defender.take_damage(hit.damage);
                let defender_ref = CardRef::new(side.opponent(), defender_slot, defender.name.clone());
                let knocked_out = defender.hp() == 0;

                let how = match (&ability, kind) {
                    (Some(ability), _) => format!("uses {}", ability.name),
                    (None, ActionKind::Skill) => "attacks (ability on cooldown)".to_string(),
                    _ => "attacks".to_string(),
                };
                tracing::debug!(
                    attacker = %attacker_ref,
                    defender = %defender_ref,
                    damage = hit.damage,
                    affinity = hit.affinity,
                    bonus = hit.triangle_bonus,
                    "hit"
                );
                events.push(TurnEvent::Damage {
                    source: attacker_ref.clone(),
                    target: defender_ref.clone(),
                    value: dealt,
                    ability: ability.as_ref().map(|a| a.name.clone()),
                    message: format!(
                        "{} {how} on {} for {dealt} damage",
                        attacker_ref.name, defender_ref.name
                    ),
                });

                if let Some(status) = ability.as_ref().and_then(|a| a.effect.status()) {
                    let duration = self.rules.status_duration;
                    let (recipient_side, recipient_slot) = if status == StatusKind::Shielded {
                        (side, attacker_slot)
                    } else {
                        (side.opponent(), defender_slot)
                    };
                    let recipient = &mut squads[recipient_side.index()].creatures_mut()[recipient_slot];
                    recipient.apply_status(status, duration);
                    events.push(TurnEvent::StatusApply {
                        source: attacker_ref,
                        target: CardRef::new(recipient_side, recipient_slot, recipient.name.clone()),
                        status,
                        value: duration,
                        message: format!("{} is {status} for {duration} turns", recipient.name),
                    });
                }

                knocked_out
            }
        }
    }

    fn faint_check(squad: &mut Squad, side: Side, events: &mut Vec<TurnEvent>) {
        for (slot, creature) in squad.creatures_mut().iter_mut().enumerate() {
            if creature.hp() == 0 && !creature.is_fainted() {
                creature.mark_fainted();
                events.push(TurnEvent::Faint {
                    target: CardRef::new(side, slot, creature.name.clone()),
                    message: format!("{} fainted", creature.name),
                });
            }
        }
    }

    /// Activates the first standing creature if the squad has none active.
    ///
    /// `previous` is the slot that was active before the faint check; it is
    /// logged as the outgoing creature.
    fn auto_switch(squad: &mut Squad, side: Side, previous: Option<usize>, events: &mut Vec<TurnEvent>) {
        if squad.active_index().is_some() {
            return;
        }

        let source = previous.map(|slot| CardRef::new(side, slot, squad.creatures()[slot].name.clone()));

        let Some(slot) = squad.first_available() else {
            return;
        };
        squad.activate(slot);
        let name = squad.creatures()[slot].name.clone();
        events.push(TurnEvent::Switch {
            source,
            target: CardRef::new(side, slot, name.clone()),
            automatic: true,
            message: format!("{} automatically sends in {name}", squad.owner()),
        });
    }
}

fn active_ref(squad: &Squad, side: Side) -> Option<CardRef> {
    let slot = squad.active_index()?;
    Some(CardRef::new(side, slot, squad.creatures()[slot].name.clone()))
}

fn side_summary(squad: &Squad, side: Side, action: Action, active_before: Option<CardRef>) -> SideSummary {
    SideSummary {
        action,
        active_before,
        active_after: active_ref(squad, side),
        remaining_hp: squad.active().map_or(0, |creature| creature.hp()),
    }
}
