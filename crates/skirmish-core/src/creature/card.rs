//! Normalization of upstream card data into strict [`Creature`]s.
//!
//! Card data arrives from an external collaborator and is not guaranteed clean:
//! fields may be missing, element tags may be misspelled, HP may exceed its
//! maximum. All of that is repaired here, once, at squad-construction time, so
//! the resolver never branches on data shape. Every repair is logged with
//! `tracing::warn!` as a tolerance.

use serde::{Deserialize, Serialize};

use super::{Ability, Creature, EffectKind, Rarity, Stats};
use crate::element::Element;
use crate::rules::CombatRules;

/// Ability fields as they arrive from upstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityData {
    /// Display name.
    pub name: Option<String>,
    /// Skill power.
    pub power: Option<u32>,
    /// Effect tag (`"burn"`, `"shield"`, ...).
    pub effect: Option<String>,
    /// Cooldown length.
    pub cooldown: Option<u32>,
    /// Remaining cooldown carried over from upstream.
    pub remaining_cooldown: Option<u32>,
}

/// Loosely-typed creature card as supplied by the outer layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardData {
    /// Display name.
    pub name: Option<String>,
    /// Element tag as free text.
    pub element: Option<String>,
    /// Rarity tag as free text.
    pub rarity: Option<String>,
    /// Attack stat.
    pub attack: Option<u32>,
    /// Defense stat.
    pub defense: Option<u32>,
    /// Speed stat.
    pub speed: Option<u32>,
    /// Current HP. Defaults to `max_hp`.
    pub hp: Option<u32>,
    /// Maximum HP.
    pub max_hp: Option<u32>,
    /// The creature's ability, if the card has one.
    pub ability: Option<AbilityData>,
}

impl Creature {
    /// Builds a strict creature from upstream card data.
    ///
    /// Repairs applied (each logged as a warning):
    /// - missing or unknown element → [`Element::Unaligned`]
    /// - missing ability → `rules.default_ability`
    /// - `max_hp` missing or zero → 1
    /// - `hp` above `max_hp` → `max_hp`
    /// - remaining cooldown above the cooldown length → the cooldown length
    #[must_use]
    pub fn from_card(card: &CardData, rules: &CombatRules) -> Self {
        let name = card.name.clone().unwrap_or_else(|| "Unnamed".to_string());

        let element = match card.element.as_deref().map(Element::parse_tag) {
            Some(Some(element)) => element,
            Some(None) => {
                tracing::warn!(
                    creature = %name,
                    tag = ?card.element,
                    "unknown element tag, treating as unaligned"
                );
                Element::Unaligned
            }
            None => {
                tracing::warn!(creature = %name, "card has no element, treating as unaligned");
                Element::Unaligned
            }
        };

        let rarity = card
            .rarity
            .as_deref()
            .and_then(Rarity::parse_tag)
            .unwrap_or_default();

        let max_hp = match card.max_hp {
            Some(max_hp) if max_hp > 0 => max_hp,
            other => {
                tracing::warn!(creature = %name, max_hp = ?other, "invalid max hp, using 1");
                1
            }
        };

        let hp = match card.hp {
            Some(hp) if hp > max_hp => {
                tracing::warn!(creature = %name, hp, max_hp, "hp above max, clamping");
                max_hp
            }
            Some(hp) => hp,
            None => max_hp,
        };

        let ability = match &card.ability {
            Some(data) => normalize_ability(&name, data, &rules.default_ability),
            None => {
                tracing::warn!(creature = %name, "card has no ability, using default");
                rules.default_ability.clone()
            }
        };

        Self {
            name,
            element,
            rarity,
            stats: Stats {
                attack: card.attack.unwrap_or(0),
                defense: card.defense.unwrap_or(0),
                speed: card.speed.unwrap_or(0),
                hp,
                max_hp,
            },
            ability,
            statuses: Vec::new(),
            flags: super::CreatureFlags::empty(),
        }
    }
}

fn normalize_ability(creature: &str, data: &AbilityData, fallback: &Ability) -> Ability {
    let effect = match data.effect.as_deref() {
        None => EffectKind::Strike,
        Some(tag) => EffectKind::parse_tag(tag).unwrap_or_else(|| {
            tracing::warn!(creature, tag, "unknown ability effect, using strike");
            EffectKind::Strike
        }),
    };

    let cooldown = data.cooldown.unwrap_or(fallback.cooldown);
    let remaining_cooldown = match data.remaining_cooldown {
        Some(remaining) if remaining > cooldown => {
            tracing::warn!(creature, remaining, cooldown, "remaining cooldown above length, clamping");
            cooldown
        }
        Some(remaining) => remaining,
        None => 0,
    };

    Ability {
        name: data.name.clone().unwrap_or_else(|| fallback.name.clone()),
        power: data.power.unwrap_or(fallback.power),
        effect,
        cooldown,
        remaining_cooldown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_card() -> CardData {
        CardData {
            name: Some("Tidal".to_string()),
            element: Some("Water".to_string()),
            rarity: Some("epic".to_string()),
            attack: Some(40),
            defense: Some(25),
            speed: Some(33),
            hp: Some(80),
            max_hp: Some(90),
            ability: Some(AbilityData {
                name: Some("Surge".to_string()),
                power: Some(35),
                effect: Some("chill".to_string()),
                cooldown: Some(2),
                remaining_cooldown: None,
            }),
        }
    }

    #[test]
    fn clean_card_normalizes_verbatim() {
        let creature = Creature::from_card(&full_card(), &CombatRules::default());
        assert_eq!(creature.name, "Tidal");
        assert_eq!(creature.element, Element::Water);
        assert_eq!(creature.rarity, Rarity::Epic);
        assert_eq!(creature.hp(), 80);
        assert_eq!(creature.max_hp(), 90);
        assert_eq!(creature.ability.effect, EffectKind::Chill);
        assert_eq!(creature.ability.cooldown, 2);
        assert!(creature.ability.is_ready());
        assert!(!creature.is_active());
    }

    #[test]
    fn unknown_element_becomes_unaligned() {
        let mut card = full_card();
        card.element = Some("plasma".to_string());
        let creature = Creature::from_card(&card, &CombatRules::default());
        assert_eq!(creature.element, Element::Unaligned);
    }

    #[test]
    fn missing_ability_uses_default() {
        let mut card = full_card();
        card.ability = None;
        let rules = CombatRules::default();
        let creature = Creature::from_card(&card, &rules);
        assert_eq!(creature.ability, rules.default_ability);
    }

    #[test]
    fn hp_is_clamped_and_defaulted() {
        let mut card = full_card();
        card.hp = Some(500);
        let creature = Creature::from_card(&card, &CombatRules::default());
        assert_eq!(creature.hp(), 90);

        card.hp = None;
        let creature = Creature::from_card(&card, &CombatRules::default());
        assert_eq!(creature.hp(), 90);
    }

    #[test]
    fn zero_max_hp_becomes_one() {
        let card = CardData {
            max_hp: Some(0),
            ..CardData::default()
        };
        let creature = Creature::from_card(&card, &CombatRules::default());
        assert_eq!(creature.max_hp(), 1);
        assert_eq!(creature.hp(), 1);
    }

    #[test]
    fn remaining_cooldown_clamped_to_length() {
        let mut card = full_card();
        if let Some(ability) = card.ability.as_mut() {
            ability.remaining_cooldown = Some(9);
        }
        let creature = Creature::from_card(&card, &CombatRules::default());
        assert_eq!(creature.ability.remaining_cooldown, 2);
    }

    #[test]
    fn card_parses_from_sparse_json() {
        let card: CardData =
            serde_json::from_str(r#"{"name":"Gust","element":"air","max_hp":60}"#).unwrap();
        let creature = Creature::from_card(&card, &CombatRules::default());
        assert_eq!(creature.element, Element::Air);
        assert_eq!(creature.stats.attack, 0);
        assert_eq!(creature.hp(), 60);
    }
}
