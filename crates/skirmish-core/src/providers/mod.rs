//! Built-in decision providers.
//!
//! - [`HeuristicProvider`]: ordered rule list with an injectable RNG
//! - [`ScriptedProvider`]: plays back a fixed list of moves

mod heuristic;
mod scripted;

pub use heuristic::{
    HeuristicProvider, HeuristicRule, ANTICIPATORY_GUARD_CHANCE, DEFENSIVE_GUARD_CHANCE,
};
pub use scripted::ScriptedProvider;
