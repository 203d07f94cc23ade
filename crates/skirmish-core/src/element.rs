//! Element tags and the affinity chart that turns them into damage multipliers.
//!
//! The six element tags form an *asymmetric* advantage graph: some elements are
//! strong against two others, some against only one. The chart is plain data
//! injected into the resolver through [`CombatRules`](crate::rules::CombatRules),
//! so tests and alternate rule sets can substitute their own graph.
//!
//! # Lookup
//!
//! [`AffinityChart::multiplier`] checks the attacker's strong-against set first,
//! then the defender's:
//!
//! | Relationship | Multiplier |
//! |--------------|------------|
//! | attacker strong against defender | `advantage` (1.5) |
//! | defender strong against attacker | `resisted` (0.75) |
//! | otherwise | 1.0 |
//!
//! Unrecognized tags normalize to [`Element::Unaligned`], which appears in no
//! strong-against set and therefore always lands on 1.0.
//!
//! # Example
//!
//! ```
//! use skirmish_core::element::{AffinityChart, Element};
//!
//! let chart = AffinityChart::default();
//! assert_eq!(chart.multiplier(Element::Fire, Element::Earth), 1.5);
//! assert_eq!(chart.multiplier(Element::Earth, Element::Fire), 0.75);
//! assert_eq!(chart.multiplier(Element::Light, Element::Fire), 1.0);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// Element
// =============================================================================

/// Element tag carried by every creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    /// Fire
    Fire,
    /// Water
    Water,
    /// Earth
    Earth,
    /// Air
    Air,
    /// Light
    Light,
    /// Dark
    Dark,
    /// Landing spot for tags the chart does not know. Always neutral.
    Unaligned,
}

impl Element {
    /// The six charted elements, in declaration order.
    pub const CHARTED: [Element; 6] = [
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Light,
        Element::Dark,
    ];

    /// Parses an upstream element tag, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` for anything that is not one of the six charted tags;
    /// callers decide whether to fall back to [`Element::Unaligned`].
    #[must_use]
    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "fire" => Some(Self::Fire),
            "water" => Some(Self::Water),
            "earth" => Some(Self::Earth),
            "air" => Some(Self::Air),
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    /// Returns the lowercase tag for this element.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Water => "water",
            Self::Earth => "earth",
            Self::Air => "air",
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Unaligned => "unaligned",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Affinity Chart
// =============================================================================

/// Attacker → strong-against graph plus the two non-neutral multipliers.
///
/// The default chart is:
///
/// ```text
/// fire  -> earth, air
/// water -> fire
/// earth -> water, light
/// air   -> earth
/// light -> dark
/// dark  -> light, water
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffinityChart {
    /// For each attacking element, the elements it is strong against.
    pub strong_against: BTreeMap<Element, Vec<Element>>,
    /// Multiplier when the attacker is strong against the defender.
    pub advantage: f64,
    /// Multiplier when the defender is strong against the attacker.
    pub resisted: f64,
}

impl Default for AffinityChart {
    fn default() -> Self {
        use Element::{Air, Dark, Earth, Fire, Light, Water};

        let strong_against = BTreeMap::from([
            (Fire, vec![Earth, Air]),
            (Water, vec![Fire]),
            (Earth, vec![Water, Light]),
            (Air, vec![Earth]),
            (Light, vec![Dark]),
            (Dark, vec![Light, Water]),
        ]);

        Self {
            strong_against,
            advantage: 1.5,
            resisted: 0.75,
        }
    }
}

impl AffinityChart {
    /// Returns true if `attacker` lists `defender` in its strong-against set.
    #[must_use]
    pub fn is_strong_against(&self, attacker: Element, defender: Element) -> bool {
        self.strong_against
            .get(&attacker)
            .is_some_and(|targets| targets.contains(&defender))
    }

    /// Damage multiplier for `attacker` hitting `defender`.
    ///
    /// Always one of `advantage`, `resisted` or `1.0`.
    #[must_use]
    pub fn multiplier(&self, attacker: Element, defender: Element) -> f64 {
        if self.is_strong_against(attacker, defender) {
            self.advantage
        } else if self.is_strong_against(defender, attacker) {
            self.resisted
        } else {
            1.0
        }
    }

    /// Returns the first element found that lists itself as strong against itself.
    ///
    /// A self-advantaged element would break the "same element is neutral" rule,
    /// so configuration validation rejects such charts.
    #[must_use]
    pub fn self_listed(&self) -> Option<Element> {
        self.strong_against
            .iter()
            .find(|(attacker, targets)| targets.contains(attacker))
            .map(|(attacker, _)| *attacker)
    }
}
