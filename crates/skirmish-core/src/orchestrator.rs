//! Battle loop: drives a battle from setup to a winner or the turn cap.
//!
//! Each turn runs in three phases:
//!
//! 1. **DECIDE**: both sides' providers are asked for a move in parallel.
//!    They only read their [`BattleView`], so this is safe to overlap.
//! 2. **SUBMIT**: each move goes through the validator. A provider error or an
//!    illegal move becomes a fallback attack; nothing here aborts the battle.
//! 3. **RESOLVE**: the turn is resolved exclusively, the log is appended and
//!    the statistics are updated from the new events.
//!
//! Independent battles share nothing, so [`BattleRunner::run_many`] runs them
//! on the rayon pool.
//!
//! # Example
//!
//! ```
//! use skirmish_core::creature::{Ability, Creature, EffectKind};
//! use skirmish_core::element::Element;
//! use skirmish_core::orchestrator::BattleRunner;
//! use skirmish_core::providers::HeuristicProvider;
//! use skirmish_core::rules::BattleConfig;
//! use skirmish_core::squad::Squad;
//!
//! let make = |element| {
//!     Creature::new("c", element, 45, 25, 30, 100, Ability::new("a", 40, EffectKind::Strike, 3))
//! };
//! let a = Squad::new("alice", [make(Element::Fire), make(Element::Water), make(Element::Air)]);
//! let b = Squad::new("bob", [make(Element::Earth), make(Element::Light), make(Element::Dark)]);
//!
//! let runner = BattleRunner::new(BattleConfig::default());
//! let outcome = runner
//!     .run(a, b, &mut HeuristicProvider::seeded(1), &mut HeuristicProvider::seeded(2))
//!     .unwrap();
//!
//! assert!(outcome.turns() >= 1);
//! assert!(outcome.turns() <= 50);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::action::Move;
use crate::battle::Battle;
use crate::decision::DecisionProvider;
use crate::error::{BattleError, ReplayError};
use crate::event::TurnLog;
use crate::providers::HeuristicProvider;
use crate::rules::BattleConfig;
use crate::squad::{PlayerId, Side, Squad};
use crate::stats::AggregateStats;
use crate::view::BattleView;

// =============================================================================
// Outcome
// =============================================================================

/// Everything a finished battle hands to persistence, settlement and replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    /// Winning player. `None` for a draw.
    pub winner: Option<PlayerId>,
    /// Every resolved turn, oldest first.
    pub turn_logs: Vec<TurnLog>,
    /// Per-side totals.
    pub stats: AggregateStats,
}

impl BattleOutcome {
    /// Returns true if no winner was declared.
    #[must_use]
    pub const fn is_draw(&self) -> bool {
        self.winner.is_none()
    }

    /// Number of turns played.
    #[must_use]
    pub fn turns(&self) -> usize {
        self.turn_logs.len()
    }
}

// =============================================================================
// Runner
// =============================================================================

/// One independent battle for [`BattleRunner::run_many`].
pub struct Matchup {
    /// Squad for side A.
    pub squad_a: Squad,
    /// Squad for side B.
    pub squad_b: Squad,
    /// Decides for side A.
    pub provider_a: Box<dyn DecisionProvider>,
    /// Decides for side B.
    pub provider_b: Box<dyn DecisionProvider>,
}

impl Matchup {
    /// Creates a matchup.
    #[must_use]
    pub fn new(
        squad_a: Squad,
        squad_b: Squad,
        provider_a: impl DecisionProvider + 'static,
        provider_b: impl DecisionProvider + 'static,
    ) -> Self {
        Self {
            squad_a,
            squad_b,
            provider_a: Box::new(provider_a),
            provider_b: Box::new(provider_b),
        }
    }

    /// Heuristic against heuristic. Side B's RNG is seeded with `seed + 1`.
    #[must_use]
    pub fn heuristic(squad_a: Squad, squad_b: Squad, seed: u64) -> Self {
        Self::new(
            squad_a,
            squad_b,
            HeuristicProvider::seeded(seed),
            HeuristicProvider::seeded(seed.wrapping_add(1)),
        )
    }
}

/// Drives battles to completion under one configuration.
#[derive(Debug, Clone, Default)]
pub struct BattleRunner {
    config: BattleConfig,
}

impl BattleRunner {
    /// Creates a runner.
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        Self { config }
    }

    /// The configuration every battle runs under.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Runs a battle between two squads until a winner or the turn cap.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError`] if both squads belong to one player or the
    /// configuration is out of range. Nothing that happens during the battle
    /// is an error.
    pub fn run(
        &self,
        squad_a: Squad,
        squad_b: Squad,
        provider_a: &mut dyn DecisionProvider,
        provider_b: &mut dyn DecisionProvider,
    ) -> Result<BattleOutcome, BattleError> {
        let battle = Battle::new(squad_a, squad_b, self.config.clone())?;
        Ok(Self::drive(battle, provider_a, provider_b))
    }

    /// Runs independent battles in parallel. Results are in input order.
    #[must_use]
    pub fn run_many(&self, matchups: Vec<Matchup>) -> Vec<Result<BattleOutcome, BattleError>> {
        matchups
            .into_par_iter()
            .map(|mut matchup| {
                self.run(
                    matchup.squad_a,
                    matchup.squad_b,
                    matchup.provider_a.as_mut(),
                    matchup.provider_b.as_mut(),
                )
            })
            .collect()
    }

    /// Drives an already constructed battle to completion.
    pub fn drive(
        mut battle: Battle,
        provider_a: &mut dyn DecisionProvider,
        provider_b: &mut dyn DecisionProvider,
    ) -> BattleOutcome {
        battle.start();
        let mut stats = AggregateStats::new();

        while !battle.is_complete() {
            // DECIDE
            let (decided_a, decided_b) = {
                let view_a = battle.view_for(Side::A);
                let view_b = battle.view_for(Side::B);
                rayon::join(
                    || decide_or_fallback(provider_a, &view_a),
                    || decide_or_fallback(provider_b, &view_b),
                )
            };

            // SUBMIT
            for (side, (mv, failed)) in [(Side::A, decided_a), (Side::B, decided_b)] {
                let rejected = battle
                    .submit_or_fallback(side, mv)
                    .is_some_and(|rejection| rejection.concerns_move());
                if failed || rejected {
                    stats.record_fallback(side);
                }
            }

            // RESOLVE
            let Some(log) = battle.resolve_pending() else {
                tracing::warn!(turn = battle.turn(), "turn could not be resolved, stopping battle");
                break;
            };
            stats.record_turn(log);
        }

        let winner = battle.winner().cloned();
        tracing::info!(
            winner = winner.as_ref().map_or("draw", PlayerId::as_str),
            turns = battle.logs().len(),
            damage_a = stats.side_a.damage_dealt,
            damage_b = stats.side_b.damage_dealt,
            "battle finished"
        );

        BattleOutcome {
            winner,
            turn_logs: battle.into_logs(),
            stats,
        }
    }
}

/// Asks a provider for a move. Returns the move and whether it is a fallback.
fn decide_or_fallback(provider: &mut dyn DecisionProvider, view: &BattleView<'_>) -> (Move, bool) {
    match provider.decide(view) {
        Ok(mv) => (mv, false),
        Err(error) => {
            tracing::warn!(
                provider = provider.name(),
                side = %view.side,
                turn = view.turn,
                %error,
                "decision failed, substituting fallback attack"
            );
            (Move::fallback(&error), true)
        }
    }
}

/// Runs one battle with the given configuration.
///
/// # Errors
///
/// See [`BattleRunner::run`].
pub fn run_battle(
    config: BattleConfig,
    squad_a: Squad,
    squad_b: Squad,
    provider_a: &mut dyn DecisionProvider,
    provider_b: &mut dyn DecisionProvider,
) -> Result<BattleOutcome, BattleError> {
    BattleRunner::new(config).run(squad_a, squad_b, provider_a, provider_b)
}

// =============================================================================
// Replay
// =============================================================================

/// Re-runs a recorded battle from its starting squads and checks every turn.
///
/// The recorded moves are resubmitted as-is, so fallback attacks replay like
/// any other move. Each produced turn must match the recorded one exactly:
/// events, summary and winner.
///
/// # Errors
///
/// - [`ReplayError::Setup`] if the squads and config cannot form a battle
/// - [`ReplayError::LengthMismatch`] if the battle ends before the log does
/// - [`ReplayError::Diverged`] on the first turn that differs, or if the battle
///   is still running after the last recorded turn
pub fn verify_replay(
    config: BattleConfig,
    squad_a: Squad,
    squad_b: Squad,
    logs: &[TurnLog],
) -> Result<(), ReplayError> {
    let mut battle = Battle::new(squad_a, squad_b, config)?;
    battle.start();

    for recorded in logs {
        let turn = recorded.turn;
        if battle.is_complete() {
            return Err(ReplayError::LengthMismatch {
                recorded: logs.len(),
                replayed: battle.logs().len(),
            });
        }

        for side in Side::BOTH {
            let owner = battle.squad(side).owner().clone();
            battle
                .submit(&owner, recorded.move_for(side).clone())
                .map_err(|rejection| ReplayError::Diverged {
                    turn,
                    detail: format!("recorded move for side {side} rejected: {rejection}"),
                })?;
        }

        let replayed = battle.resolve_pending().ok_or_else(|| ReplayError::Diverged {
            turn,
            detail: "turn did not resolve".to_string(),
        })?;
        if let Some(detail) = first_difference(recorded, replayed) {
            return Err(ReplayError::Diverged { turn, detail });
        }
    }

    if !battle.is_complete() {
        return Err(ReplayError::Diverged {
            turn: battle.turn(),
            detail: "battle still running after the last recorded turn".to_string(),
        });
    }

    tracing::debug!(turns = logs.len(), "replay verified");
    Ok(())
}

fn first_difference(recorded: &TurnLog, replayed: &TurnLog) -> Option<String> {
    if recorded.turn != replayed.turn {
        return Some(format!("turn number {} replayed as {}", recorded.turn, replayed.turn));
    }
    if recorded.events.len() != replayed.events.len() {
        return Some(format!(
            "{} events recorded, {} replayed",
            recorded.events.len(),
            replayed.events.len()
        ));
    }
    if let Some((index, (want, got))) = recorded
        .events
        .iter()
        .zip(&replayed.events)
        .enumerate()
        .find(|(_, (want, got))| want != got)
    {
        return Some(format!(
            "event {index}: recorded \"{}\", replayed \"{}\"",
            want.message(),
            got.message()
        ));
    }
    if recorded.summary != replayed.summary {
        return Some("turn summary differs".to_string());
    }
    if recorded.winner != replayed.winner {
        return Some(format!("winner {:?} replayed as {:?}", recorded.winner, replayed.winner));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{Ability, Creature, EffectKind};
    use crate::decision::DecisionError;
    use crate::element::Element;
    use crate::error::{ConfigError, SquadError};
    use crate::providers::ScriptedProvider;

    fn squad(owner: &str, element: Element) -> Squad {
        let make = |name: &str| {
            Creature::new(
                name,
                element,
                40,
                20,
                30,
                60,
                Ability::new(format!("{name} Skill"), 40, EffectKind::Strike, 2),
            )
        };
        Squad::new(owner, [make("one"), make("two"), make("three")])
    }

    struct Failing;

    impl DecisionProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn decide(&mut self, _view: &BattleView<'_>) -> Result<Move, DecisionError> {
            Err(DecisionError::TimedOut)
        }
    }

    mod run_tests {
        use super::*;

        #[test]
        fn guard_forever_draws_at_cap() {
            let runner = BattleRunner::new(BattleConfig::default().with_turn_cap(5));
            let outcome = runner
                .run(
                    squad("alice", Element::Fire),
                    squad("bob", Element::Water),
                    &mut ScriptedProvider::new(vec![Move::guard(); 5]),
                    &mut ScriptedProvider::new(vec![Move::guard(); 5]),
                )
                .unwrap();
            assert!(outcome.is_draw());
            assert_eq!(outcome.turns(), 5);
            assert_eq!(outcome.stats.side_a.damage_dealt, 0);
        }

        #[test]
        fn provider_failure_becomes_fallback_attack() {
            let runner = BattleRunner::new(BattleConfig::default().with_turn_cap(1));
            let outcome = runner
                .run(
                    squad("alice", Element::Fire),
                    squad("bob", Element::Water),
                    &mut Failing,
                    &mut ScriptedProvider::new([Move::guard()]),
                )
                .unwrap();
            let log = &outcome.turn_logs[0];
            assert_eq!(log.move_a.action, crate::action::Action::Attack);
            assert!(log.move_a.rationale.as_deref().unwrap().contains("timed out"));
            assert_eq!(outcome.stats.side_a.fallbacks, 1);
            assert_eq!(outcome.stats.side_b.fallbacks, 0);
        }

        #[test]
        fn illegal_switch_counts_as_fallback() {
            let runner = BattleRunner::new(BattleConfig::default().with_turn_cap(1));
            let outcome = runner
                .run(
                    squad("alice", Element::Fire),
                    squad("bob", Element::Water),
                    &mut ScriptedProvider::new([Move::switch_to(9)]),
                    &mut ScriptedProvider::new([Move::guard()]),
                )
                .unwrap();
            assert_eq!(outcome.turn_logs[0].move_a.action, crate::action::Action::Attack);
            assert_eq!(outcome.stats.side_a.fallbacks, 1);
        }

        #[test]
        fn same_owner_is_an_error() {
            let runner = BattleRunner::default();
            let result = runner.run(
                squad("alice", Element::Fire),
                squad("alice", Element::Water),
                &mut Failing,
                &mut Failing,
            );
            assert_eq!(
                result.unwrap_err(),
                BattleError::Squad(SquadError::SameOwner(PlayerId::new("alice")))
            );
        }

        #[test]
        fn zero_turn_cap_is_refused_before_any_turn() {
            let runner = BattleRunner::new(BattleConfig::default().with_turn_cap(0));
            let result = runner.run(
                squad("alice", Element::Fire),
                squad("bob", Element::Water),
                &mut ScriptedProvider::new([Move::attack()]),
                &mut ScriptedProvider::new([Move::attack()]),
            );
            assert_eq!(result.unwrap_err(), BattleError::Config(ConfigError::ZeroTurnCap));
        }

        #[test]
        fn run_many_keeps_order() {
            let runner = BattleRunner::new(BattleConfig::default().with_turn_cap(3));
            let matchups: Vec<_> = (0..4)
                .map(|i| {
                    Matchup::heuristic(
                        squad(&format!("a{i}"), Element::Fire),
                        squad(&format!("b{i}"), Element::Earth),
                        i,
                    )
                })
                .collect();
            let outcomes = runner.run_many(matchups);
            assert_eq!(outcomes.len(), 4);
            for (i, outcome) in outcomes.iter().enumerate() {
                let outcome = outcome.as_ref().unwrap();
                let first = &outcome.turn_logs[0];
                assert_eq!(
                    first.summary.side_a.active_before.as_ref().unwrap().side,
                    Side::A
                );
                if let Some(winner) = &outcome.winner {
                    assert!(winner.as_str().ends_with(&i.to_string()));
                }
            }
        }
    }

    mod replay_tests {
        use super::*;

        #[test]
        fn recorded_battle_replays() {
            let a = squad("alice", Element::Fire);
            let b = squad("bob", Element::Earth);
            let config = BattleConfig::default();
            let outcome = BattleRunner::new(config.clone())
                .run(
                    a.clone(),
                    b.clone(),
                    &mut HeuristicProvider::seeded(5),
                    &mut HeuristicProvider::seeded(6),
                )
                .unwrap();
            assert_eq!(verify_replay(config, a, b, &outcome.turn_logs), Ok(()));
        }

        #[test]
        fn tampered_log_diverges() {
            let a = squad("alice", Element::Fire);
            let b = squad("bob", Element::Earth);
            let config = BattleConfig::default();
            let mut outcome = BattleRunner::new(config.clone())
                .run(
                    a.clone(),
                    b.clone(),
                    &mut HeuristicProvider::seeded(5),
                    &mut HeuristicProvider::seeded(6),
                )
                .unwrap();
            if let Some(crate::event::TurnEvent::Damage { value, .. }) =
                outcome.turn_logs[0].events.first_mut()
            {
                *value += 1;
            }
            outcome.turn_logs[0].summary.side_a.remaining_hp += 1;

            let err = verify_replay(config, a, b, &outcome.turn_logs).unwrap_err();
            assert!(matches!(err, ReplayError::Diverged { turn: 1, .. }));
        }

        #[test]
        fn truncated_log_is_incomplete() {
            let a = squad("alice", Element::Fire);
            let b = squad("bob", Element::Earth);
            let config = BattleConfig::default().with_turn_cap(4);
            let outcome = BattleRunner::new(config.clone())
                .run(
                    a.clone(),
                    b.clone(),
                    &mut ScriptedProvider::new(vec![Move::guard(); 4]),
                    &mut ScriptedProvider::new(vec![Move::guard(); 4]),
                )
                .unwrap();
            let err = verify_replay(config, a, b, &outcome.turn_logs[..2]).unwrap_err();
            assert!(matches!(err, ReplayError::Diverged { turn: 3, .. }));
        }

        #[test]
        fn extended_log_is_a_length_mismatch() {
            let a = squad("alice", Element::Fire);
            let b = squad("bob", Element::Earth);
            let config = BattleConfig::default().with_turn_cap(2);
            let outcome = BattleRunner::new(config.clone())
                .run(
                    a.clone(),
                    b.clone(),
                    &mut ScriptedProvider::new(vec![Move::guard(); 2]),
                    &mut ScriptedProvider::new(vec![Move::guard(); 2]),
                )
                .unwrap();
            let mut logs = outcome.turn_logs.clone();
            logs.push(logs[1].clone());
            assert_eq!(
                verify_replay(config, a, b, &logs),
                Err(ReplayError::LengthMismatch {
                    recorded: 3,
                    replayed: 2
                })
            );
        }
    }
}
