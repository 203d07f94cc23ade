//! Combat rules and battle configuration.
//!
//! Every numeric constant of turn resolution lives in [`CombatRules`] rather
//! than in module state, so a battle can be run under an alternate rule set
//! (and tests can substitute one). [`BattleConfig`] adds the turn ceiling and
//! can be loaded from JSON.
//!
//! # Example
//!
//! ```
//! use skirmish_core::rules::BattleConfig;
//!
//! let config = BattleConfig::from_json(r#"{ "turn_cap": 20 }"#).unwrap();
//! assert_eq!(config.turn_cap, 20);
//! assert_eq!(config.rules.triangle_bonus, 1.3);
//! ```

use serde::{Deserialize, Serialize};

use crate::creature::{Ability, EffectKind};
use crate::element::AffinityChart;
use crate::error::ConfigError;

/// Recommended turn ceiling before a battle is declared a draw.
pub const DEFAULT_TURN_CAP: u32 = 50;

// =============================================================================
// Combat Rules
// =============================================================================

/// Constants and data tables used by the turn resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatRules {
    /// Element affinity graph.
    pub chart: AffinityChart,
    /// Damage multiplier for the triangle winner.
    pub triangle_bonus: f64,
    /// Fraction of the attack stat used as a basic attack's base damage.
    pub attack_scale: f64,
    /// Fraction of defender defense subtracted from skill hits.
    pub skill_reduction: f64,
    /// Fraction of defender defense subtracted from basic attacks.
    pub attack_reduction: f64,
    /// Fraction of max HP restored by guarding.
    pub guard_heal_fraction: f64,
    /// Floor applied to every hit before rounding.
    pub minimum_damage: f64,
    /// Duration of statuses applied by ability effects.
    pub status_duration: u32,
    /// Ability given to cards that arrive without one.
    pub default_ability: Ability,
}

impl Default for CombatRules {
    fn default() -> Self {
        Self {
            chart: AffinityChart::default(),
            triangle_bonus: 1.3,
            attack_scale: 0.8,
            skill_reduction: 0.3,
            attack_reduction: 0.5,
            guard_heal_fraction: 0.05,
            minimum_damage: 1.0,
            status_duration: 2,
            default_ability: Ability::new("Tackle", 20, EffectKind::Strike, 2),
        }
    }
}

impl CombatRules {
    /// Checks that every constant is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for non-finite or negative multipliers,
    /// fractions outside `[0, 1]`, and [`ConfigError::SelfAdvantage`] when the
    /// chart lists an element as strong against itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("chart.advantage", self.chart.advantage),
            ("chart.resisted", self.chart.resisted),
            ("triangle_bonus", self.triangle_bonus),
            ("attack_scale", self.attack_scale),
            ("minimum_damage", self.minimum_damage),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        let fractions = [
            ("skill_reduction", self.skill_reduction),
            ("attack_reduction", self.attack_reduction),
            ("guard_heal_fraction", self.guard_heal_fraction),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }

        if let Some(element) = self.chart.self_listed() {
            return Err(ConfigError::SelfAdvantage(element));
        }

        Ok(())
    }
}

// =============================================================================
// Battle Config
// =============================================================================

/// Configuration for a single battle run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Turns played before the battle ends in a draw.
    pub turn_cap: u32,
    /// Rules used for every turn.
    pub rules: CombatRules,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            turn_cap: DEFAULT_TURN_CAP,
            rules: CombatRules::default(),
        }
    }
}

impl BattleConfig {
    /// Sets the turn ceiling.
    #[must_use]
    pub fn with_turn_cap(mut self, turn_cap: u32) -> Self {
        self.turn_cap = turn_cap;
        self
    }

    /// Replaces the combat rules.
    #[must_use]
    pub fn with_rules(mut self, rules: CombatRules) -> Self {
        self.rules = rules;
        self
    }

    /// Parses and validates a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed JSON and the errors of
    /// [`BattleConfig::validate`] on out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|error| ConfigError::Parse(error.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the turn ceiling and the rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTurnCap`] or any error of [`CombatRules::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.turn_cap == 0 {
            return Err(ConfigError::ZeroTurnCap);
        }
        self.rules.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    #[test]
    fn defaults_validate() {
        assert!(BattleConfig::default().validate().is_ok());
        assert_eq!(BattleConfig::default().turn_cap, 50);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            BattleConfig::from_json(r#"{ "rules": { "triangle_bonus": 1.5 } }"#).unwrap();
        assert_eq!(config.turn_cap, DEFAULT_TURN_CAP);
        assert_eq!(config.rules.triangle_bonus, 1.5);
        assert_eq!(config.rules.attack_reduction, 0.5);
        assert_eq!(config.rules.chart, AffinityChart::default());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = BattleConfig::from_json("{ turn_cap: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn zero_turn_cap_rejected() {
        let err = BattleConfig::from_json(r#"{ "turn_cap": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTurnCap));
    }

    #[test]
    fn out_of_range_fraction_rejected() {
        let rules = CombatRules {
            guard_heal_fraction: 1.5,
            ..CombatRules::default()
        };
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::InvalidValue { field: "guard_heal_fraction", .. })
        ));
    }

    #[test]
    fn self_advantaged_chart_rejected() {
        let mut rules = CombatRules::default();
        rules
            .chart
            .strong_against
            .insert(Element::Air, vec![Element::Air]);
        assert!(matches!(
            rules.validate(),
            Err(ConfigError::SelfAdvantage(Element::Air))
        ));
    }
}
