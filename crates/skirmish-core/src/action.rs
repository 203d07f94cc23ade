//! Moves submitted by players and decision providers.
//!
//! A [`Move`] is an [`Action`] plus audit annotations. The annotations (free
//! text rationale, an optional [`Prediction`] from external providers) are
//! carried into the replay log but never read by turn resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a creature does this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Basic attack scaled from the attack stat.
    Attack,
    /// Use the creature's ability.
    Skill,
    /// Heal a little and deal no damage.
    Guard,
    /// Swap the active creature for the benched one at this squad index.
    Switch(usize),
}

impl Action {
    /// The action's tag, without the switch target.
    #[must_use]
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::Attack => ActionKind::Attack,
            Self::Skill => ActionKind::Skill,
            Self::Guard => ActionKind::Guard,
            Self::Switch(_) => ActionKind::Switch,
        }
    }

    /// Returns the switch target, if this is a switch.
    #[must_use]
    pub const fn switch_target(self) -> Option<usize> {
        match self {
            Self::Switch(target) => Some(target),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch(target) => write!(f, "switch({target})"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

/// Tag of an [`Action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// Basic attack
    Attack,
    /// Ability use
    Skill,
    /// Guard
    Guard,
    /// Switch
    Switch,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Skill => write!(f, "skill"),
            Self::Guard => write!(f, "guard"),
            Self::Switch => write!(f, "switch"),
        }
    }
}

/// Forecast attached by decision sources that predict the opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// What the source expects the opponent to do.
    pub predicted_opponent: Option<ActionKind>,
    /// Confidence in `[0, 1]`.
    pub confidence: f32,
}

/// A submitted move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    /// The chosen action.
    pub action: Action,
    /// Why it was chosen. Audit only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    /// Opponent forecast from the decision source. Audit only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<Prediction>,
}

impl Move {
    /// Creates a move with no annotations.
    #[must_use]
    pub const fn new(action: Action) -> Self {
        Self {
            action,
            rationale: None,
            prediction: None,
        }
    }

    /// Basic attack.
    #[must_use]
    pub const fn attack() -> Self {
        Self::new(Action::Attack)
    }

    /// Ability use.
    #[must_use]
    pub const fn skill() -> Self {
        Self::new(Action::Skill)
    }

    /// Guard.
    #[must_use]
    pub const fn guard() -> Self {
        Self::new(Action::Guard)
    }

    /// Switch to the creature at `target`.
    #[must_use]
    pub const fn switch_to(target: usize) -> Self {
        Self::new(Action::Switch(target))
    }

    /// The move substituted when a submission is rejected or a provider fails.
    #[must_use]
    pub fn fallback(reason: impl fmt::Display) -> Self {
        Self::attack().with_rationale(format!("fallback attack: {reason}"))
    }

    /// Attaches a rationale.
    #[must_use]
    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Attaches a prediction.
    #[must_use]
    pub fn with_prediction(mut self, prediction: Prediction) -> Self {
        self.prediction = Some(prediction);
        self
    }
}

impl From<Action> for Move {
    fn from(action: Action) -> Self {
        Self::new(action)
    }
}
