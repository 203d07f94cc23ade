//! The attack / skill / guard advantage cycle.
//!
//! `attack` beats `skill`, `skill` beats `guard`, `guard` beats `attack`.
//! Identical actions tie. A switch takes no part in the cycle, so any turn in
//! which either side switches has no triangle outcome.

use crate::action::{Action, ActionKind};
use crate::event::TriangleOutcome;

/// Returns true if `a` beats `b` in the cycle.
#[must_use]
pub const fn beats(a: ActionKind, b: ActionKind) -> bool {
    matches!(
        (a, b),
        (ActionKind::Attack, ActionKind::Skill)
            | (ActionKind::Skill, ActionKind::Guard)
            | (ActionKind::Guard, ActionKind::Attack)
    )
}

/// Compares side A's action with side B's.
#[must_use]
pub fn compare(a: Action, b: Action) -> TriangleOutcome {
    let (a, b) = (a.kind(), b.kind());
    if a == ActionKind::Switch || b == ActionKind::Switch {
        TriangleOutcome::None
    } else if a == b {
        TriangleOutcome::Tie
    } else if beats(a, b) {
        TriangleOutcome::SideA
    } else if beats(b, a) {
        TriangleOutcome::SideB
    } else {
        TriangleOutcome::Tie
    }
}
