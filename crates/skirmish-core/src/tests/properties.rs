//! Property tests over random creatures, squads and move sequences.

use proptest::prelude::*;

use crate::action::{Action, Move};
use crate::battle::Battle;
use crate::creature::{Ability, Creature, EffectKind};
use crate::element::{AffinityChart, Element};
use crate::error::MoveRejection;
use crate::event::TurnEvent;
use crate::resolver::TurnResolver;
use crate::rules::BattleConfig;
use crate::squad::{PlayerId, Side, Squad};

// =============================================================================
// Strategies
// =============================================================================

fn element() -> impl Strategy<Value = Element> {
    prop::sample::select(vec![
        Element::Fire,
        Element::Water,
        Element::Earth,
        Element::Air,
        Element::Light,
        Element::Dark,
        Element::Unaligned,
    ])
}

fn effect() -> impl Strategy<Value = EffectKind> {
    prop::sample::select(vec![
        EffectKind::Strike,
        EffectKind::Burn,
        EffectKind::Chill,
        EffectKind::Shield,
    ])
}

prop_compose! {
    fn creature()(
        element in element(),
        attack in 0u32..120,
        defense in 0u32..80,
        speed in 0u32..80,
        max_hp in 1u32..300,
        hp_percent in 0u32..=100,
        power in 0u32..100,
        effect in effect(),
        cooldown in 0u32..5,
        remaining in 0u32..5,
    ) -> Creature {
        let mut ability = Ability::new("skill", power, effect, cooldown);
        ability.remaining_cooldown = remaining.min(cooldown);
        let mut creature = Creature::new("c", element, attack, defense, speed, max_hp, ability);
        creature.stats.hp = max_hp * hp_percent / 100;
        creature
    }
}

prop_compose! {
    fn squad(owner: &'static str)(members in prop::array::uniform3(creature())) -> Squad {
        Squad::new(owner, members)
    }
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Attack),
        Just(Action::Skill),
        Just(Action::Guard),
        (0usize..4).prop_map(Action::Switch),
    ]
}

fn turns() -> impl Strategy<Value = Vec<(Action, Action)>> {
    prop::collection::vec((action(), action()), 1..20)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn multiplier_is_one_of_three_values(attacker in element(), defender in element()) {
        let chart = AffinityChart::default();
        let m = chart.multiplier(attacker, defender);
        prop_assert!(m == 0.75 || m == 1.0 || m == 1.5);
        prop_assert_eq!(chart.multiplier(attacker, attacker), 1.0);
    }

    #[test]
    fn hp_stays_in_bounds(mut a in squad("alice"), mut b in squad("bob"), turns in turns()) {
        let resolver = TurnResolver::default();
        for (action_a, action_b) in turns {
            resolver.resolve(&mut a, &mut b, &Move::new(action_a), &Move::new(action_b));
            for creature in a.creatures().iter().chain(b.creatures()) {
                prop_assert!(creature.hp() <= creature.max_hp());
            }
            for squad in [&a, &b] {
                let active = squad.creatures().iter().filter(|c| c.is_active()).count();
                if squad.is_defeated() {
                    prop_assert_eq!(active, 0);
                } else {
                    prop_assert_eq!(active, 1);
                }
            }
        }
    }

    #[test]
    fn guard_never_lowers_hp(mut a in squad("alice"), mut b in squad("bob")) {
        let before: Vec<u32> = a.creatures().iter().chain(b.creatures()).map(Creature::hp).collect();
        let resolution = TurnResolver::default().resolve(&mut a, &mut b, &Move::guard(), &Move::guard());
        let after: Vec<u32> = a.creatures().iter().chain(b.creatures()).map(Creature::hp).collect();

        for (old, new) in before.iter().zip(&after) {
            prop_assert!(new >= old);
        }
        let dealt_damage = resolution.events.iter().any(|e| matches!(e, TurnEvent::Damage { .. }));
        prop_assert!(!dealt_damage);
    }

    #[test]
    fn cooldown_only_grows_on_use(mut a in squad("alice"), mut b in squad("bob"), turns in turns()) {
        let resolver = TurnResolver::default();
        for (action_a, action_b) in turns {
            let before: Vec<u32> = a
                .creatures()
                .iter()
                .chain(b.creatures())
                .map(|c| c.ability.remaining_cooldown)
                .collect();
            let resolution = resolver.resolve(&mut a, &mut b, &Move::new(action_a), &Move::new(action_b));

            for (side, squad) in [(Side::A, &a), (Side::B, &b)] {
                for (slot, creature) in squad.creatures().iter().enumerate() {
                    let old = before[side.index() * 3 + slot];
                    let new = creature.ability.remaining_cooldown;
                    let used = resolution.events.iter().any(|e| matches!(
                        e,
                        TurnEvent::Damage { source, ability: Some(_), .. }
                            if source.side == side && source.slot == slot
                    ));
                    if used {
                        prop_assert_eq!(new, creature.ability.cooldown.saturating_sub(1));
                    } else {
                        prop_assert!(new <= old);
                    }
                }
            }
        }
    }

    #[test]
    fn switch_to_fainted_is_always_rejected(mut a in squad("alice"), b in squad("bob"), target in 0usize..3) {
        a.creatures_mut()[target].mark_fainted();
        let mut battle = Battle::new(a, b, BattleConfig::default()).unwrap();
        battle.start();
        prop_assume!(!battle.is_complete());

        let result = battle.submit(&PlayerId::new("alice"), Move::switch_to(target));
        prop_assert_eq!(result, Err(MoveRejection::SwitchToFainted(target)));
    }

    #[test]
    fn resolution_is_repeatable(a in squad("alice"), b in squad("bob"), action_a in action(), action_b in action()) {
        let resolver = TurnResolver::default();
        let (mut a1, mut b1) = (a.clone(), b.clone());
        let (mut a2, mut b2) = (a, b);
        let first = resolver.resolve(&mut a1, &mut b1, &Move::new(action_a), &Move::new(action_b));
        let second = resolver.resolve(&mut a2, &mut b2, &Move::new(action_a), &Move::new(action_b));
        prop_assert_eq!(first, second);
        prop_assert_eq!(a1, a2);
        prop_assert_eq!(b1, b2);
    }
}
