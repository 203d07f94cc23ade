//! Damage and heal arithmetic.
//!
//! ```text
//! base      = skill ready ? ability.power : attack_scale * attack
//! raw       = base * affinity(attacker, defender) * (triangle won ? triangle_bonus : 1)
//!           - defense * (skill ready ? skill_reduction : attack_reduction)
//! damage    = round(max(raw, minimum_damage))
//! ```
//!
//! A `skill` whose ability is on cooldown falls back to the basic attack
//! formula but keeps whatever triangle bonus it earned as a `skill`.

use crate::action::ActionKind;
use crate::creature::Creature;
use crate::rules::CombatRules;

/// Which formula a hit used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// Ability power, skill reduction.
    Skill,
    /// Scaled attack stat, attack reduction.
    Basic,
}

/// A computed hit, not yet applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Final damage, at least the rules' minimum.
    pub damage: u32,
    /// Formula used.
    pub kind: HitKind,
    /// Affinity multiplier applied.
    pub affinity: f64,
    /// Whether the triangle bonus applied.
    pub triangle_bonus: bool,
}

/// Computes the damage `attacker` deals to `defender` with an attack or skill.
///
/// `action` other than [`ActionKind::Skill`] uses the basic formula.
#[must_use]
pub fn compute_hit(
    attacker: &Creature,
    defender: &Creature,
    action: ActionKind,
    won_triangle: bool,
    rules: &CombatRules,
) -> Hit {
    let kind = if action == ActionKind::Skill && attacker.ability.is_ready() {
        HitKind::Skill
    } else {
        HitKind::Basic
    };

    let (base, reduction) = match kind {
        HitKind::Skill => (f64::from(attacker.ability.power), rules.skill_reduction),
        HitKind::Basic => (
            f64::from(attacker.stats.attack) * rules.attack_scale,
            rules.attack_reduction,
        ),
    };

    let affinity = rules.chart.multiplier(attacker.element, defender.element);
    let mut raw = base * affinity;
    if won_triangle {
        raw *= rules.triangle_bonus;
    }
    raw -= f64::from(defender.stats.defense) * reduction;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let damage = raw.max(rules.minimum_damage).round() as u32;

    Hit {
        damage,
        kind,
        affinity,
        triangle_bonus: won_triangle,
    }
}

/// HP a guarding creature restores: `round(max_hp * guard_heal_fraction)`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn guard_heal(creature: &Creature, rules: &CombatRules) -> u32 {
    (f64::from(creature.max_hp()) * rules.guard_heal_fraction).round() as u32
}
