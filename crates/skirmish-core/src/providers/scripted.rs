//! Fixed move lists, for tests and replays.

use std::collections::VecDeque;

use crate::action::Move;
use crate::decision::{DecisionError, DecisionProvider};
use crate::event::TurnLog;
use crate::squad::Side;
use crate::view::BattleView;

/// Plays back a queue of moves, one per call.
///
/// Once the queue is empty every call fails with [`DecisionError::Exhausted`],
/// which the battle loop answers with a fallback attack.
#[derive(Debug, Clone, Default)]
pub struct ScriptedProvider {
    name: String,
    moves: VecDeque<Move>,
}

impl ScriptedProvider {
    /// Creates a provider that plays `moves` in order.
    #[must_use]
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            name: "scripted".to_string(),
            moves: moves.into_iter().collect(),
        }
    }

    /// Creates a provider that repeats the moves `side` made in a recorded battle.
    #[must_use]
    pub fn from_logs(logs: &[TurnLog], side: Side) -> Self {
        Self::new(logs.iter().map(|log| log.move_for(side).clone())).named("replay")
    }

    /// Sets the name reported in logs.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Moves not yet played.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.moves.len()
    }
}

impl DecisionProvider for ScriptedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self, view: &BattleView<'_>) -> Result<Move, DecisionError> {
        self.moves
            .pop_front()
            .ok_or(DecisionError::Exhausted(view.turn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::{Ability, Creature, EffectKind};
    use crate::element::Element;
    use crate::squad::Squad;

    fn squad(owner: &str) -> Squad {
        let make = || {
            Creature::new("c", Element::Earth, 30, 30, 30, 100, Ability::new("a", 30, EffectKind::Strike, 2))
        };
        Squad::new(owner, [make(), make(), make()])
    }

    #[test]
    fn plays_in_order_then_exhausts() {
        let (a, b) = (squad("alice"), squad("bob"));
        let mut provider = ScriptedProvider::new([Move::guard(), Move::switch_to(1)]);

        let view = BattleView::new(1, Side::A, &a, &b);
        assert_eq!(provider.decide(&view), Ok(Move::guard()));
        assert_eq!(provider.decide(&view), Ok(Move::switch_to(1)));
        assert_eq!(provider.remaining(), 0);

        let view = BattleView::new(3, Side::A, &a, &b);
        assert_eq!(provider.decide(&view), Err(DecisionError::Exhausted(3)));
    }

    #[test]
    fn name_is_configurable() {
        let provider = ScriptedProvider::new([]).named("fixture");
        assert_eq!(provider.name(), "fixture");
    }
}
