//! A single battle: two squads, pending moves and the replay log.
//!
//! [`Battle`] is the state machine `Setup -> Active -> Complete`. Moves are
//! submitted per player, checked by the [`MoveValidator`], and resolved once
//! both sides have one queued. Every resolved turn appends a [`TurnLog`].
//!
//! Resolution needs `&mut Battle`, so within one thread the borrow checker
//! already serializes turns. Callers that accept submissions from several
//! threads share the battle through a [`BattleHandle`].
//!
//! # Example
//!
//! ```
//! use skirmish_core::action::Move;
//! use skirmish_core::battle::{Battle, BattlePhase};
//! use skirmish_core::creature::{Ability, Creature, EffectKind};
//! use skirmish_core::element::Element;
//! use skirmish_core::rules::BattleConfig;
//! use skirmish_core::squad::{PlayerId, Squad};
//!
//! let make = |name: &str| {
//!     Creature::new(name, Element::Water, 35, 25, 30, 90, Ability::new("Surge", 35, EffectKind::Strike, 2))
//! };
//! let a = Squad::new("alice", [make("a1"), make("a2"), make("a3")]);
//! let b = Squad::new("bob", [make("b1"), make("b2"), make("b3")]);
//!
//! let mut battle = Battle::new(a, b, BattleConfig::default()).unwrap();
//! battle.start();
//! battle.submit(&PlayerId::new("alice"), Move::attack()).unwrap();
//! battle.submit(&PlayerId::new("bob"), Move::guard()).unwrap();
//!
//! let log = battle.resolve_pending().unwrap();
//! assert_eq!(log.turn, 1);
//! assert_eq!(battle.turn(), 2);
//! assert_eq!(battle.phase(), BattlePhase::Active);
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::action::Move;
use crate::error::{BattleError, MoveRejection, SquadError};
use crate::event::TurnLog;
use crate::resolver::TurnResolver;
use crate::rules::BattleConfig;
use crate::squad::{PlayerId, Side, Squad};
use crate::validator::MoveValidator;
use crate::view::BattleView;

/// Lifecycle phase of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattlePhase {
    /// Squads are set; no moves accepted yet.
    Setup,
    /// Accepting and resolving moves.
    Active,
    /// A winner was declared or the turn cap was reached.
    Complete,
}

// =============================================================================
// Battle
// =============================================================================

/// One battle between two squads.
#[derive(Debug, Clone)]
pub struct Battle {
    squads: [Squad; 2],
    phase: BattlePhase,
    turn: u32,
    pending: [Option<Move>; 2],
    logs: Vec<TurnLog>,
    winner: Option<PlayerId>,
    config: BattleConfig,
    resolver: TurnResolver,
}

impl Battle {
    /// Creates a battle in the `Setup` phase.
    ///
    /// # Errors
    ///
    /// Returns [`SquadError::SameOwner`] if both squads belong to one player,
    /// or the [`ConfigError`](crate::error::ConfigError) from
    /// [`BattleConfig::validate`].
    pub fn new(squad_a: Squad, squad_b: Squad, config: BattleConfig) -> Result<Self, BattleError> {
        if squad_a.owner() == squad_b.owner() {
            return Err(SquadError::SameOwner(squad_a.owner().clone()).into());
        }
        config.validate()?;
        let resolver = TurnResolver::new(config.rules.clone());
        Ok(Self {
            squads: [squad_a, squad_b],
            phase: BattlePhase::Setup,
            turn: 0,
            pending: [None, None],
            logs: Vec::new(),
            winner: None,
            config,
            resolver,
        })
    }

    /// Moves `Setup -> Active` and opens turn 1. Does nothing in any other phase.
    ///
    /// A battle that starts with a squad already wiped out completes at once.
    pub fn start(&mut self) {
        if self.phase != BattlePhase::Setup {
            return;
        }
        self.turn = 1;
        self.phase = BattlePhase::Active;
        match (self.squads[0].is_defeated(), self.squads[1].is_defeated()) {
            (false, false) => {}
            (a_defeated, b_defeated) => {
                tracing::warn!(a_defeated, b_defeated, "squad defeated before the first turn");
                if a_defeated != b_defeated {
                    let survivor = if a_defeated { Side::B } else { Side::A };
                    self.winner = Some(self.squads[survivor.index()].owner().clone());
                }
                self.phase = BattlePhase::Complete;
            }
        }
        tracing::info!(
            a = %self.squads[0].owner(),
            b = %self.squads[1].owner(),
            turn_cap = self.config.turn_cap,
            "battle started"
        );
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> BattlePhase {
        self.phase
    }

    /// Returns true once the battle is over.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == BattlePhase::Complete
    }

    /// Current 1-based turn number. Zero before the battle starts.
    #[must_use]
    pub const fn turn(&self) -> u32 {
        self.turn
    }

    /// The squad fighting on `side`.
    #[must_use]
    pub const fn squad(&self, side: Side) -> &Squad {
        &self.squads[side.index()]
    }

    /// Resolved turns, oldest first.
    #[must_use]
    pub fn logs(&self) -> &[TurnLog] {
        &self.logs
    }

    /// Consumes the battle, returning its log.
    #[must_use]
    pub fn into_logs(self) -> Vec<TurnLog> {
        self.logs
    }

    /// Winner, once declared. `None` for a battle in progress or a draw.
    #[must_use]
    pub const fn winner(&self) -> Option<&PlayerId> {
        self.winner.as_ref()
    }

    /// Battle configuration.
    #[must_use]
    pub const fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// Side owned by `player`, if they are a participant.
    #[must_use]
    pub fn side_of(&self, player: &PlayerId) -> Option<Side> {
        Side::BOTH
            .into_iter()
            .find(|side| self.squads[side.index()].owner() == player)
    }

    /// Move queued for `side` this turn.
    #[must_use]
    pub fn pending(&self, side: Side) -> Option<&Move> {
        self.pending[side.index()].as_ref()
    }

    /// Returns true if `side` has a move queued this turn.
    #[must_use]
    pub fn has_submitted(&self, side: Side) -> bool {
        self.pending[side.index()].is_some()
    }

    /// What `side` is allowed to see.
    #[must_use]
    pub fn view_for(&self, side: Side) -> BattleView<'_> {
        BattleView::for_side(self, side)
    }

    /// Validates and queues a move.
    ///
    /// # Errors
    ///
    /// Returns the validator's [`MoveRejection`]; nothing is queued in that case.
    pub fn submit(&mut self, player: &PlayerId, mv: Move) -> Result<Side, MoveRejection> {
        MoveValidator::validate(self, player, &mv)?;
        let side = self
            .side_of(player)
            .ok_or_else(|| MoveRejection::NotParticipant(player.clone()))?;
        self.pending[side.index()] = Some(mv);
        Ok(side)
    }

    /// Queues a move for `side`, substituting a fallback attack if the move is illegal.
    ///
    /// Returns the rejection, if any. Submission-level rejections (wrong phase,
    /// duplicate) leave the pending slot as it was.
    pub fn submit_or_fallback(&mut self, side: Side, mv: Move) -> Option<MoveRejection> {
        let player = self.squads[side.index()].owner().clone();
        match self.submit(&player, mv) {
            Ok(_) => None,
            Err(rejection) if rejection.concerns_move() => {
                tracing::warn!(%player, %rejection, "illegal move replaced by fallback attack");
                self.pending[side.index()] = Some(Move::fallback(&rejection));
                Some(rejection)
            }
            Err(rejection) => {
                tracing::warn!(%player, %rejection, "submission refused");
                Some(rejection)
            }
        }
    }

    /// Resolves the turn once both sides have a move queued.
    ///
    /// Returns the new log entry, or `None` if the battle is not active or a
    /// side has not submitted yet.
    pub fn resolve_pending(&mut self) -> Option<&TurnLog> {
        if self.phase != BattlePhase::Active || self.pending.iter().any(Option::is_none) {
            return None;
        }
        let move_a = self.pending[0].take()?;
        let move_b = self.pending[1].take()?;

        let [squad_a, squad_b] = &mut self.squads;
        let resolution = self.resolver.resolve(squad_a, squad_b, &move_a, &move_b);

        tracing::debug!(
            turn = self.turn,
            a = %move_a.action,
            b = %move_b.action,
            events = resolution.events.len(),
            "turn resolved"
        );

        self.logs.push(TurnLog {
            turn: self.turn,
            move_a,
            move_b,
            summary: resolution.summary,
            events: resolution.events,
            winner: resolution.winner.clone(),
        });

        if resolution.winner.is_some() {
            self.winner = resolution.winner;
            self.phase = BattlePhase::Complete;
        } else if self.squads.iter().all(Squad::is_defeated) || self.turn >= self.config.turn_cap {
            self.phase = BattlePhase::Complete;
        } else {
            self.turn += 1;
        }

        if self.phase == BattlePhase::Complete {
            tracing::info!(
                winner = self.winner.as_ref().map_or("draw", PlayerId::as_str),
                turns = self.turn,
                "battle complete"
            );
        }

        self.logs.last()
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// A battle shared between threads.
///
/// Every operation takes the battle's lock for its full duration, so turn
/// resolution is atomic with respect to submissions from other threads. A
/// panic while the lock is held does not leave the battle unusable.
#[derive(Debug, Clone)]
pub struct BattleHandle {
    inner: Arc<Mutex<Battle>>,
}

impl BattleHandle {
    /// Wraps a battle.
    #[must_use]
    pub fn new(battle: Battle) -> Self {
        Self {
            inner: Arc::new(Mutex::new(battle)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Battle> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`Battle::start`].
    pub fn start(&self) {
        self.lock().start();
    }

    /// See [`Battle::submit`].
    ///
    /// # Errors
    ///
    /// Returns the validator's [`MoveRejection`].
    pub fn submit(&self, player: &PlayerId, mv: Move) -> Result<Side, MoveRejection> {
        self.lock().submit(player, mv)
    }

    /// Submits, then resolves if this completed the turn. Returns the new log entry if one was produced.
    ///
    /// # Errors
    ///
    /// Returns the validator's [`MoveRejection`].
    pub fn submit_and_resolve(&self, player: &PlayerId, mv: Move) -> Result<Option<TurnLog>, MoveRejection> {
        let mut battle = self.lock();
        battle.submit(player, mv)?;
        Ok(battle.resolve_pending().cloned())
    }

    /// See [`Battle::resolve_pending`].
    #[must_use]
    pub fn resolve_pending(&self) -> Option<TurnLog> {
        self.lock().resolve_pending().cloned()
    }

    /// Runs `f` with exclusive access to the battle.
    pub fn with<R>(&self, f: impl FnOnce(&mut Battle) -> R) -> R {
        f(&mut self.lock())
    }

    /// A copy of the battle's current state.
    #[must_use]
    pub fn snapshot(&self) -> Battle {
        self.lock().clone()
    }
}
