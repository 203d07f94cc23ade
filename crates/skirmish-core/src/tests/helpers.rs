//! Factories for creatures, squads and battles used across test suites.

use crate::creature::{Ability, Creature, EffectKind};
use crate::element::Element;
use crate::squad::Squad;

// =============================================================================
// Creatures
// =============================================================================

/// A creature with a ready strike ability of power 40, cooldown 3.
pub fn creature(name: &str, element: Element, attack: u32, defense: u32, speed: u32, max_hp: u32) -> Creature {
    Creature::new(
        name,
        element,
        attack,
        defense,
        speed,
        max_hp,
        Ability::new(format!("{name} Skill"), 40, EffectKind::Strike, 3),
    )
}

/// Sets current HP without touching flags.
pub fn with_hp(mut creature: Creature, hp: u32) -> Creature {
    creature.stats.hp = hp;
    creature
}

/// Fire attacker: attack 45, skill power 40, cooldown 3, speed 40.
pub fn fire_attacker() -> Creature {
    creature("Cinder", Element::Fire, 45, 20, 40, 100)
}

/// Earth defender: defense 30, speed 20.
pub fn earth_defender() -> Creature {
    creature("Boulder", Element::Earth, 30, 30, 20, 120)
}

// =============================================================================
// Squads
// =============================================================================

/// Fire-led squad owned by `alice`.
pub fn alice_squad() -> Squad {
    Squad::new(
        "alice",
        [
            fire_attacker(),
            creature("Tidal", Element::Water, 38, 28, 32, 110),
            creature("Zephyr", Element::Air, 36, 18, 55, 90),
        ],
    )
}

/// Earth-led squad owned by `bob`.
pub fn bob_squad() -> Squad {
    Squad::new(
        "bob",
        [
            earth_defender(),
            creature("Halo", Element::Light, 40, 24, 35, 100),
            creature("Shade", Element::Dark, 44, 22, 38, 95),
        ],
    )
}

/// A squad of three identical creatures.
pub fn uniform_squad(owner: &str, element: Element, max_hp: u32) -> Squad {
    let make = |name: &str| creature(name, element, 40, 25, 30, max_hp);
    Squad::new(owner, [make("first"), make("second"), make("third")])
}

/// Installs a test-writer subscriber once per process so `tracing` output shows
/// up in failing tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
