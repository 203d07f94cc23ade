//! # Skirmish Core
//!
//! Deterministic combat resolution for three-creature squad duels.
//!
//! Two players (or agents) each bring a [`Squad`] of three creatures. Every
//! turn both sides pick a [`Move`], the [`TurnResolver`] applies the pair and
//! reports what happened as [`TurnEvent`]s, and the turn is recorded in a
//! [`TurnLog`]. The battle ends when one squad is wiped out or the turn cap is
//! reached.
//!
//! ## Architecture
//!
//! - **State**: [`Creature`], [`Squad`], [`Battle`]
//! - **Rules**: [`AffinityChart`], [`CombatRules`], [`BattleConfig`]
//! - **Decisions**: [`DecisionProvider`] implementations read a [`BattleView`]
//!   and propose moves; [`MoveValidator`] checks them
//! - **Resolution**: [`TurnResolver`] mutates the squads in a fixed order
//! - **Orchestration**: [`BattleRunner`] loops decide / submit / resolve and
//!   accumulates [`AggregateStats`]
//!
//! Resolution has no randomness and no I/O. The only entropy in the crate is
//! the RNG injected into [`HeuristicProvider`], so a battle between seeded
//! providers replays exactly ([`verify_replay`]).
//!
//! ## Usage
//!
//! ```
//! use skirmish_core::{
//!     Ability, BattleConfig, BattleRunner, Creature, EffectKind, Element, HeuristicProvider, Squad,
//! };
//!
//! let make = |name: &str, element| {
//!     Creature::new(name, element, 42, 24, 30, 110, Ability::new("Burst", 38, EffectKind::Strike, 3))
//! };
//! let alice = Squad::new("alice", [
//!     make("Cinder", Element::Fire),
//!     make("Tidal", Element::Water),
//!     make("Zephyr", Element::Air),
//! ]);
//! let bob = Squad::new("bob", [
//!     make("Boulder", Element::Earth),
//!     make("Halo", Element::Light),
//!     make("Shade", Element::Dark),
//! ]);
//!
//! let outcome = BattleRunner::new(BattleConfig::default())
//!     .run(alice, bob, &mut HeuristicProvider::seeded(1), &mut HeuristicProvider::seeded(2))
//!     .unwrap();
//!
//! println!("winner: {:?} after {} turns", outcome.winner, outcome.turns());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod action;
pub mod battle;
pub mod creature;
pub mod decision;
pub mod element;
pub mod error;
pub mod event;
pub mod orchestrator;
pub mod providers;
pub mod resolver;
pub mod rules;
pub mod squad;
pub mod stats;
pub mod validator;
pub mod view;

pub use action::{Action, ActionKind, Move, Prediction};
pub use battle::{Battle, BattleHandle, BattlePhase};
pub use creature::{Ability, CardData, Creature, EffectKind, Rarity, StatusEffect, StatusKind};
pub use decision::DecisionProvider;
pub use element::{AffinityChart, Element};
pub use error::{BattleError, ConfigError, DecisionError, MoveRejection, ReplayError, SquadError};
pub use event::{CardRef, SideSummary, TriangleOutcome, TurnEvent, TurnLog, TurnSummary};
pub use orchestrator::{run_battle, verify_replay, BattleOutcome, BattleRunner, Matchup};
pub use providers::{HeuristicProvider, ScriptedProvider};
pub use resolver::{Resolution, TurnResolver};
pub use rules::{BattleConfig, CombatRules};
pub use squad::{PlayerId, Side, Squad};
pub use stats::{AggregateStats, SideStats};
pub use validator::MoveValidator;
pub use view::{BattleView, OpponentView};

#[cfg(test)]
mod tests;
