//! Rule-based decision provider for fully autonomous matches.
//!
//! [`HeuristicProvider`] walks an ordered rule list and returns the move of the
//! first rule that matches. It looks only at its own squad and the opponent's
//! visible active creature.
//!
//! | # | Rule | Move |
//! |---|------|------|
//! | 1 | HP < 25% and a benched counter exists | switch to the counter |
//! | 2 | HP < 15% and no counter | guard |
//! | 3 | opponent HP < 20% and own attack > 30 | skill if ready, else attack |
//! | 4 | ability ready | skill |
//! | 5 | opponent has the elemental edge, turn divisible by 3 | switch to a counter, else to a neutral creature |
//! | 6 | HP < 40% and opponent attack > own defense, p = 0.3 | guard |
//! | 7 | turn divisible by 4 and HP > 50%, p = 0.2 | guard |
//! | 8 | own element has the edge | attack |
//! | 9 | otherwise | attack |
//!
//! Rules 6 and 7 draw from the injected RNG, and only after their deterministic
//! conditions hold, so a fixed seed reproduces a whole battle.
//!
//! # Example
//!
//! ```
//! use skirmish_core::creature::{Ability, Creature, EffectKind};
//! use skirmish_core::decision::DecisionProvider;
//! use skirmish_core::element::Element;
//! use skirmish_core::providers::HeuristicProvider;
//! use skirmish_core::squad::{Side, Squad};
//! use skirmish_core::view::BattleView;
//! use skirmish_core::action::Action;
//!
//! let make = |element| {
//!     Creature::new("c", element, 40, 25, 30, 100, Ability::new("a", 35, EffectKind::Strike, 2))
//! };
//! let own = Squad::new("alice", [make(Element::Fire), make(Element::Water), make(Element::Air)]);
//! let opp = Squad::new("bob", [make(Element::Earth), make(Element::Earth), make(Element::Earth)]);
//!
//! let mut provider = HeuristicProvider::seeded(7);
//! let mv = provider.decide(&BattleView::new(1, Side::A, &own, &opp)).unwrap();
//!
//! // The ability is ready, so the provider uses it.
//! assert_eq!(mv.action, Action::Skill);
//! assert!(mv.rationale.is_some());
//! ```

use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::action::Move;
use crate::decision::{DecisionError, DecisionProvider};
use crate::element::{AffinityChart, Element};
use crate::view::BattleView;

/// Probability of the defensive guard (rule 6).
pub const DEFENSIVE_GUARD_CHANCE: f64 = 0.3;

/// Probability of the anticipatory guard (rule 7).
pub const ANTICIPATORY_GUARD_CHANCE: f64 = 0.2;

const DEFAULT_RATIONALES: [&str; 5] = [
    "Keeping up steady pressure with a basic attack.",
    "No clear edge in this matchup, attacking to test their defenses.",
    "Ability is recharging, chipping away in the meantime.",
    "Trading blows while the elements are even.",
    "Holding tempo with a straightforward attack.",
];

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeuristicRule {
    /// Low HP, switching to a creature with the elemental edge.
    EmergencySwitch,
    /// Critical HP with nowhere to go.
    EmergencyGuard,
    /// Opponent is nearly down.
    FinishingBlow,
    /// Ability is off cooldown.
    SkillReady,
    /// Escaping an elemental disadvantage.
    CounterSwitch,
    /// Bracing against a stronger attacker.
    DefensiveGuard,
    /// Occasional guard while healthy.
    AnticipatoryGuard,
    /// Own element has the edge.
    ElementalAdvantage,
    /// Nothing else matched.
    Default,
}

impl fmt::Display for HeuristicRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EmergencySwitch => "emergency_switch",
            Self::EmergencyGuard => "emergency_guard",
            Self::FinishingBlow => "finishing_blow",
            Self::SkillReady => "skill_ready",
            Self::CounterSwitch => "counter_switch",
            Self::DefensiveGuard => "defensive_guard",
            Self::AnticipatoryGuard => "anticipatory_guard",
            Self::ElementalAdvantage => "elemental_advantage",
            Self::Default => "default",
        };
        f.write_str(name)
    }
}

/// Heuristic decision provider with an injectable entropy source.
#[derive(Debug, Clone)]
pub struct HeuristicProvider<R = ChaCha8Rng> {
    rng: R,
    chart: AffinityChart,
}

impl HeuristicProvider<ChaCha8Rng> {
    /// Creates a provider whose random branches are driven by a seeded ChaCha RNG.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> HeuristicProvider<R> {
    /// Creates a provider with a caller-supplied RNG.
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            chart: AffinityChart::default(),
        }
    }

    /// Replaces the affinity chart used to judge matchups.
    #[must_use]
    pub fn with_chart(mut self, chart: AffinityChart) -> Self {
        self.chart = chart;
        self
    }

    /// Runs the rule list and reports which rule fired.
    pub fn evaluate(&mut self, view: &BattleView<'_>) -> (HeuristicRule, Move) {
        let (Some(own), Some(opp)) = (view.own_active(), view.opponent_active()) else {
            return (
                HeuristicRule::Default,
                Move::attack().with_rationale("No matchup to read, attacking."),
            );
        };

        let hp = own.hp_percent();
        let ready = own.ability.is_ready();
        let counter = self.bench_where(view, |chart, element| chart.is_strong_against(element, opp.element));

        // 1-2. Critical HP.
        if hp < 25.0 {
            if let Some(slot) = counter {
                return (
                    HeuristicRule::EmergencySwitch,
                    Move::switch_to(slot).with_rationale(format!(
                        "{} is badly hurt, bringing in a counter to {}.",
                        own.name, opp.name
                    )),
                );
            }
            if hp < 15.0 {
                return (
                    HeuristicRule::EmergencyGuard,
                    Move::guard().with_rationale(format!(
                        "{} is nearly down with no counter on the bench, guarding.",
                        own.name
                    )),
                );
            }
        }

        // 3. Finishing blow.
        if opp.hp_percent() < 20.0 && own.stats.attack > 30 {
            let mv = if ready { Move::skill() } else { Move::attack() };
            return (
                HeuristicRule::FinishingBlow,
                mv.with_rationale(format!("{} is almost out, going for the finish.", opp.name)),
            );
        }

        // 4. Ability ready.
        if ready {
            return (
                HeuristicRule::SkillReady,
                Move::skill().with_rationale(format!("{} is ready, using it.", own.ability.name)),
            );
        }

        // 5. Escape a bad matchup every third turn.
        if view.turn % 3 == 0 && self.chart.is_strong_against(opp.element, own.element) {
            let target = counter.or_else(|| {
                self.bench_where(view, |chart, element| !chart.is_strong_against(opp.element, element))
            });
            if let Some(slot) = target {
                return (
                    HeuristicRule::CounterSwitch,
                    Move::switch_to(slot).with_rationale(format!(
                        "{} is outmatched by {}, rotating out.",
                        own.name, opp.element
                    )),
                );
            }
        }

        // 6. Brace against a stronger attacker.
        if hp < 40.0 && opp.attack > own.stats.defense && self.roll(DEFENSIVE_GUARD_CHANCE) {
            return (
                HeuristicRule::DefensiveGuard,
                Move::guard().with_rationale(format!(
                    "{} hits harder than {} can take, guarding.",
                    opp.name, own.name
                )),
            );
        }

        // 7. Occasional guard while healthy.
        if view.turn % 4 == 0 && hp > 50.0 && self.roll(ANTICIPATORY_GUARD_CHANCE) {
            return (
                HeuristicRule::AnticipatoryGuard,
                Move::guard().with_rationale("Expecting a big hit, guarding early."),
            );
        }

        // 8. Press an elemental edge.
        if self.chart.is_strong_against(own.element, opp.element) {
            return (
                HeuristicRule::ElementalAdvantage,
                Move::attack().with_rationale(format!(
                    "{} has the edge over {}, attacking.",
                    own.element, opp.element
                )),
            );
        }

        // 9. Default.
        let template = DEFAULT_RATIONALES[view.turn as usize % DEFAULT_RATIONALES.len()];
        (HeuristicRule::Default, Move::attack().with_rationale(template))
    }

    /// First standing benched creature whose element satisfies `keep`.
    fn bench_where(
        &self,
        view: &BattleView<'_>,
        keep: impl Fn(&AffinityChart, Element) -> bool,
    ) -> Option<usize> {
        view.own
            .bench()
            .find(|(_, creature)| keep(&self.chart, creature.element))
            .map(|(slot, _)| slot)
    }

    fn roll(&mut self, chance: f64) -> bool {
        self.rng.gen::<f64>() < chance
    }
}

impl<R: Rng + Send> DecisionProvider for HeuristicProvider<R> {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn decide(&mut self, view: &BattleView<'_>) -> Result<Move, DecisionError> {
        let (rule, mv) = self.evaluate(view);
        tracing::debug!(side = %view.side, turn = view.turn, %rule, action = %mv.action, "heuristic decision");
        Ok(mv)
    }
}
