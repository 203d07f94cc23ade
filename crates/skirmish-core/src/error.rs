//! Error types.
//!
//! None of these abort a battle. Move rejections and decision failures are
//! recovered by substituting a basic attack; configuration, squad and replay
//! errors are raised before or after a battle runs, never during resolution.

use thiserror::Error;

use crate::element::Element;
use crate::squad::PlayerId;

/// Why the validator refused a submitted move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveRejection {
    /// The battle is still in setup or already complete.
    #[error("battle is not accepting moves")]
    BattleNotActive,
    /// The submitting player owns neither squad.
    #[error("player {0} is not a participant in this battle")]
    NotParticipant(PlayerId),
    /// The player already has a move queued for this turn.
    #[error("player {0} already submitted a move this turn")]
    AlreadySubmitted(PlayerId),
    /// The switch target index does not exist in the squad.
    #[error("switch target {0} is out of range")]
    SwitchOutOfRange(usize),
    /// The switch target has fainted.
    #[error("switch target {0} has fainted")]
    SwitchToFainted(usize),
    /// The switch target is already the active creature.
    #[error("switch target {0} is already active")]
    SwitchToActive(usize),
}

impl MoveRejection {
    /// Returns true if the move itself was illegal, as opposed to the
    /// submission (wrong phase, wrong player, duplicate).
    ///
    /// Only these rejections are replaced by a fallback attack; the others
    /// leave the pending slot untouched.
    #[must_use]
    pub const fn concerns_move(&self) -> bool {
        matches!(
            self,
            Self::SwitchOutOfRange(_) | Self::SwitchToFainted(_) | Self::SwitchToActive(_)
        )
    }
}

/// A decision provider could not produce a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// The backing decision source is unreachable.
    #[error("decision source unavailable: {0}")]
    Unavailable(String),
    /// The decision source did not answer in time.
    #[error("decision source timed out")]
    TimedOut,
    /// The decision source answered with something that is not a move.
    #[error("malformed decision: {0}")]
    Malformed(String),
    /// A scripted source has no moves left.
    #[error("scripted moves exhausted at turn {0}")]
    Exhausted(u32),
}

/// Squad construction failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SquadError {
    /// A squad needs exactly three cards.
    #[error("squad requires exactly 3 creatures, got {0}")]
    WrongSize(usize),
    /// Both squads belong to the same player.
    #[error("both squads are owned by {0}")]
    SameOwner(PlayerId),
}

/// Configuration could not be loaded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The JSON document did not parse. Carries the parser's message.
    #[error("failed to parse battle config: {0}")]
    Parse(String),
    /// The turn ceiling must be at least one.
    #[error("turn cap must be at least 1")]
    ZeroTurnCap,
    /// A numeric constant is outside its legal range.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The affinity chart lists an element as strong against itself.
    #[error("element {0} is listed as strong against itself")]
    SelfAdvantage(Element),
}

/// A battle could not be set up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    /// The squads cannot meet.
    #[error(transparent)]
    Squad(#[from] SquadError),
    /// The configuration is out of range.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A replay did not reproduce the recorded battle.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    /// The battle could not be rebuilt.
    #[error("cannot rebuild battle: {0}")]
    Setup(#[from] BattleError),
    /// The recorded log is longer than the replayed battle.
    #[error("battle ended after {replayed} turns but the log has {recorded}")]
    LengthMismatch {
        /// Turns in the recorded log.
        recorded: usize,
        /// Turns the replay produced.
        replayed: usize,
    },
    /// A turn produced different output.
    #[error("turn {turn} diverged: {detail}")]
    Diverged {
        /// 1-based turn number.
        turn: u32,
        /// What differed.
        detail: String,
    },
}
