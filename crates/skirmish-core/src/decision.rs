//! Abstraction over whatever picks a side's move.
//!
//! The battle loop asks a [`DecisionProvider`] for one move per side per turn.
//! Implementations can be:
//! - the built-in [`HeuristicProvider`](crate::providers::HeuristicProvider)
//! - scripted or replayed move lists ([`ScriptedProvider`](crate::providers::ScriptedProvider))
//! - an adapter around an external decision service
//!
//! All of them are treated alike. A provider only ever sees a [`BattleView`],
//! never the opponent's hidden state, and a failure is answered with a
//! fallback attack rather than by stopping the battle.

use crate::action::Move;
use crate::view::BattleView;

pub use crate::error::DecisionError;

/// Source of moves for one side of a battle.
///
/// The two sides' providers are called concurrently, so implementations must
/// be `Send`. Each provider is only ever called from one thread at a time.
pub trait DecisionProvider: Send {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Picks a move for the viewing side.
    ///
    /// # Errors
    ///
    /// Returns a [`DecisionError`] if no move could be produced. The caller
    /// substitutes a fallback attack.
    fn decide(&mut self, view: &BattleView<'_>) -> Result<Move, DecisionError>;
}

impl<P: DecisionProvider + ?Sized> DecisionProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decide(&mut self, view: &BattleView<'_>) -> Result<Move, DecisionError> {
        (**self).decide(view)
    }
}
