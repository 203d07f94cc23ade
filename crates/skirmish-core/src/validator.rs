//! Move legality checks.
//!
//! The validator only reads battle state. A rejection is never fatal: the
//! caller substitutes a basic attack (see [`Battle::submit_or_fallback`]).

use crate::action::{Action, Move};
use crate::battle::{Battle, BattlePhase};
use crate::error::MoveRejection;
use crate::squad::PlayerId;

/// Stateless move validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveValidator;

impl MoveValidator {
    /// Checks that `player` may submit `mv` in `battle` right now.
    ///
    /// Checks run in this order and the first failure is returned:
    /// 1. battle is active
    /// 2. player owns one of the squads
    /// 3. player has not already submitted this turn
    /// 4. a switch targets an existing, standing, benched creature
    ///
    /// # Errors
    ///
    /// Returns the [`MoveRejection`] for the first failed check.
    pub fn validate(battle: &Battle, player: &PlayerId, mv: &Move) -> Result<(), MoveRejection> {
        if battle.phase() != BattlePhase::Active {
            return Err(MoveRejection::BattleNotActive);
        }

        let side = battle
            .side_of(player)
            .ok_or_else(|| MoveRejection::NotParticipant(player.clone()))?;

        if battle.has_submitted(side) {
            return Err(MoveRejection::AlreadySubmitted(player.clone()));
        }

        if let Action::Switch(target) = mv.action {
            let squad = battle.squad(side);
            let creature = squad
                .creature(target)
                .ok_or(MoveRejection::SwitchOutOfRange(target))?;
            if creature.is_fainted() {
                return Err(MoveRejection::SwitchToFainted(target));
            }
            if squad.active_index() == Some(target) {
                return Err(MoveRejection::SwitchToActive(target));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{Ability, Creature, EffectKind};
    use crate::element::Element;
    use crate::rules::BattleConfig;
    use crate::squad::Squad;

    fn active_battle() -> Battle {
        let make = |name: &str, hp: u32| {
            let mut creature = Creature::new(
                name,
                Element::Light,
                30,
                30,
                30,
                100,
                Ability::new("Beam", 30, EffectKind::Strike, 2),
            );
            creature.stats.hp = hp;
            creature
        };
        let a = Squad::new("alice", [make("a0", 100), make("a1", 0), make("a2", 100)]);
        let b = Squad::new("bob", [make("b0", 100), make("b1", 100), make("b2", 100)]);
        let mut battle = Battle::new(a, b, BattleConfig::default()).unwrap();
        battle.start();
        battle
    }

    fn alice() -> PlayerId {
        PlayerId::new("alice")
    }

    #[test]
    fn legal_moves_pass() {
        let battle = active_battle();
        for mv in [Move::attack(), Move::skill(), Move::guard(), Move::switch_to(2)] {
            assert_eq!(MoveValidator::validate(&battle, &alice(), &mv), Ok(()));
        }
    }

    #[test]
    fn inactive_battle_rejects() {
        let make = || {
            Creature::new("c", Element::Fire, 1, 1, 1, 1, Ability::new("a", 1, EffectKind::Strike, 1))
        };
        let battle = Battle::new(
            Squad::new("alice", [make(), make(), make()]),
            Squad::new("bob", [make(), make(), make()]),
            BattleConfig::default(),
        )
        .unwrap();
        assert_eq!(
            MoveValidator::validate(&battle, &alice(), &Move::attack()),
            Err(MoveRejection::BattleNotActive)
        );
    }

    #[test]
    fn outsider_rejected() {
        let battle = active_battle();
        let mallory = PlayerId::new("mallory");
        assert_eq!(
            MoveValidator::validate(&battle, &mallory, &Move::attack()),
            Err(MoveRejection::NotParticipant(mallory))
        );
    }

    #[test]
    fn duplicate_rejected() {
        let mut battle = active_battle();
        battle.submit(&alice(), Move::attack()).unwrap();
        assert_eq!(
            MoveValidator::validate(&battle, &alice(), &Move::guard()),
            Err(MoveRejection::AlreadySubmitted(alice()))
        );
    }

    #[test]
    fn bad_switch_targets_rejected() {
        let battle = active_battle();
        let check = |target| MoveValidator::validate(&battle, &alice(), &Move::switch_to(target));
        assert_eq!(check(1), Err(MoveRejection::SwitchToFainted(1)));
        assert_eq!(check(3), Err(MoveRejection::SwitchOutOfRange(3)));
        assert_eq!(check(0), Err(MoveRejection::SwitchToActive(0)));
    }
}
