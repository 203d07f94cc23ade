//! Battle statistics accumulated from the event stream.
//!
//! [`AggregateStats`] is fed every [`TurnEvent`] as turns resolve; it never
//! rescans the log. Settlement and dashboards read the totals from the
//! finished [`BattleOutcome`](crate::orchestrator::BattleOutcome).

use serde::{Deserialize, Serialize};

use crate::event::{TurnEvent, TurnLog};
use crate::squad::Side;

/// Totals for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SideStats {
    /// HP removed from the opposing squad.
    pub damage_dealt: u64,
    /// HP restored by guarding.
    pub healing: u64,
    /// This side's creatures that fainted.
    pub faints: u32,
    /// Switches this side chose.
    pub switches: u32,
    /// Switches forced on this side by a faint.
    pub auto_switches: u32,
    /// Skill hits made off cooldown.
    pub skills_used: u32,
    /// Moves replaced by a fallback attack.
    pub fallbacks: u32,
}

/// Totals for both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Side A.
    pub side_a: SideStats,
    /// Side B.
    pub side_b: SideStats,
}

impl AggregateStats {
    /// Creates empty totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for one side.
    #[must_use]
    pub const fn side(&self, side: Side) -> &SideStats {
        match side {
            Side::A => &self.side_a,
            Side::B => &self.side_b,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideStats {
        match side {
            Side::A => &mut self.side_a,
            Side::B => &mut self.side_b,
        }
    }

    /// Folds one event into the totals.
    pub fn record(&mut self, event: &TurnEvent) {
        match event {
            TurnEvent::Damage {
                source,
                value,
                ability,
                ..
            } => {
                let stats = self.side_mut(source.side);
                stats.damage_dealt += u64::from(*value);
                if ability.is_some() {
                    stats.skills_used += 1;
                }
            }
            TurnEvent::Heal { target, value, .. } => {
                self.side_mut(target.side).healing += u64::from(*value);
            }
            TurnEvent::StatusApply { .. } => {}
            TurnEvent::Switch {
                target, automatic, ..
            } => {
                let stats = self.side_mut(target.side);
                if *automatic {
                    stats.auto_switches += 1;
                } else {
                    stats.switches += 1;
                }
            }
            TurnEvent::Faint { target, .. } => {
                self.side_mut(target.side).faints += 1;
            }
        }
    }

    /// Folds every event of a turn into the totals.
    pub fn record_turn(&mut self, log: &TurnLog) {
        for event in &log.events {
            self.record(event);
        }
    }

    /// Counts a move that was replaced by a fallback attack.
    pub fn record_fallback(&mut self, side: Side) {
        self.side_mut(side).fallbacks += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CardRef;

    fn card(side: Side) -> CardRef {
        CardRef::new(side, 0, "c")
    }

    #[test]
    fn damage_credits_the_source() {
        let mut stats = AggregateStats::new();
        stats.record(&TurnEvent::Damage {
            source: card(Side::A),
            target: card(Side::B),
            value: 39,
            ability: None,
            message: String::new(),
        });
        stats.record(&TurnEvent::Damage {
            source: card(Side::A),
            target: card(Side::B),
            value: 51,
            ability: Some("Flare".to_string()),
            message: String::new(),
        });
        assert_eq!(stats.side_a.damage_dealt, 90);
        assert_eq!(stats.side_a.skills_used, 1);
        assert_eq!(stats.side_b, SideStats::default());
    }

    #[test]
    fn faints_and_switches_count_against_the_target() {
        let mut stats = AggregateStats::new();
        stats.record(&TurnEvent::Faint {
            target: card(Side::B),
            message: String::new(),
        });
        stats.record(&TurnEvent::Switch {
            source: Some(card(Side::B)),
            target: CardRef::new(Side::B, 1, "next"),
            automatic: true,
            message: String::new(),
        });
        stats.record(&TurnEvent::Switch {
            source: Some(card(Side::A)),
            target: CardRef::new(Side::A, 2, "swap"),
            automatic: false,
            message: String::new(),
        });
        assert_eq!(stats.side(Side::B).faints, 1);
        assert_eq!(stats.side(Side::B).auto_switches, 1);
        assert_eq!(stats.side(Side::A).switches, 1);
    }

    #[test]
    fn healing_and_fallbacks() {
        let mut stats = AggregateStats::new();
        stats.record(&TurnEvent::Heal {
            target: card(Side::A),
            value: 5,
            message: String::new(),
        });
        stats.record_fallback(Side::B);
        assert_eq!(stats.side_a.healing, 5);
        assert_eq!(stats.side_b.fallbacks, 1);
    }
}
