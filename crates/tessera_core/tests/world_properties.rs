//! # World Property Tests
//!
//! Checks the ECS guarantees end to end through the public `World` API:
//!
//! 1. **Density**: packed stores never have holes
//! 2. **Consistency**: interest sets always equal the signature match
//! 3. **Handle reuse**: recycled handles start empty
//! 4. **Capacity**: the ceiling is exact and recoverable
//!
//! Run with: cargo test --package tessera_core --test world_properties

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tessera_core::{Component, EcsError, EcsResult, Entity, System, World, MAX_ENTITY_COUNT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Health {
    max: i32,
    current: i32,
}
impl Component for Health {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Status {
    alive: bool,
}
impl Component for Status {}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Armor(u16);
impl Component for Armor {}

/// Tracks Health + Status.
#[derive(Default)]
struct SystemA;

impl System for SystemA {
    fn update(
        &mut self,
        _world: &mut World,
        _entities: &[Entity],
        _delta_time: f32,
    ) -> EcsResult<()> {
        Ok(())
    }
}

/// Tracks Armor only.
#[derive(Default)]
struct SystemB;

impl System for SystemB {
    fn update(
        &mut self,
        _world: &mut World,
        _entities: &[Entity],
        _delta_time: f32,
    ) -> EcsResult<()> {
        Ok(())
    }
}

/// Tracks nothing, so it matches every live entity.
#[derive(Default)]
struct Everything;

impl System for Everything {
    fn update(
        &mut self,
        _world: &mut World,
        _entities: &[Entity],
        _delta_time: f32,
    ) -> EcsResult<()> {
        Ok(())
    }
}

fn setup(capacity: usize) -> World {
    let mut world = World::with_capacity(capacity).unwrap();
    world.register_component::<Health>().unwrap();
    world.register_component::<Status>().unwrap();
    world.register_component::<Armor>().unwrap();

    world.register_system::<SystemA>().unwrap();
    world.track_component::<SystemA, Health>().unwrap();
    world.track_component::<SystemA, Status>().unwrap();

    world.register_system::<SystemB>().unwrap();
    world.track_component::<SystemB, Armor>().unwrap();

    world.register_system::<Everything>().unwrap();
    world
}

fn assert_store_dense<C: Component>(world: &World) {
    let store = world.store::<C>().unwrap();
    assert_eq!(store.as_slice().len(), store.len());
    assert_eq!(store.entities().len(), store.len());
    for (index, &owner) in store.entities().iter().enumerate() {
        assert_eq!(store.index_of(owner), Some(index), "maps disagree at {index}");
        assert!(world.has_component::<C>(owner));
    }
}

fn assert_interest<S: System>(world: &World) {
    let required = world.system_signature::<S>().unwrap();
    let interest = world.interest_set::<S>().unwrap();
    for e in world.entities() {
        let matches = world.signature(e).unwrap().matches(required);
        assert_eq!(interest.contains(&e), matches, "{e} disagrees with its signature");
    }
    for e in interest {
        assert!(world.is_alive(*e), "{e} is in an interest set but dead");
    }
}

fn assert_consistent(world: &World) {
    assert_store_dense::<Health>(world);
    assert_store_dense::<Status>(world);
    assert_store_dense::<Armor>(world);
    assert_interest::<SystemA>(world);
    assert_interest::<SystemB>(world);
    assert_interest::<Everything>(world);
}

/// Test: random mutation sequences keep every invariant after every step.
#[test]
fn test_random_mutations_keep_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x7E55_E7A);
    let mut world = setup(64);
    let mut live: Vec<Entity> = Vec::new();

    for _ in 0..5_000 {
        match rng.gen_range(0..8) {
            0 | 1 if live.len() < 64 => {
                live.push(world.create_entity().unwrap());
            }
            2 if !live.is_empty() => {
                let e = live.swap_remove(rng.gen_range(0..live.len()));
                world.destroy_entity(e).unwrap();
            }
            3 | 4 if !live.is_empty() => {
                let e = live[rng.gen_range(0..live.len())];
                let value = rng.gen_range(0..100);
                match rng.gen_range(0..3) {
                    0 if !world.has_component::<Health>(e) => {
                        world.add_component(e, Health { max: value, current: value }).unwrap();
                    }
                    1 if !world.has_component::<Status>(e) => {
                        world.add_component(e, Status { alive: value % 2 == 0 }).unwrap();
                    }
                    2 if !world.has_component::<Armor>(e) => {
                        world.add_component(e, Armor(value as u16)).unwrap();
                    }
                    _ => {}
                }
            }
            5 | 6 if !live.is_empty() => {
                let e = live[rng.gen_range(0..live.len())];
                match rng.gen_range(0..3) {
                    0 if world.has_component::<Health>(e) => {
                        world.remove_component::<Health>(e).unwrap();
                    }
                    1 if world.has_component::<Status>(e) => {
                        world.remove_component::<Status>(e).unwrap();
                    }
                    2 if world.has_component::<Armor>(e) => {
                        world.remove_component::<Armor>(e).unwrap();
                    }
                    _ => {}
                }
            }
            _ => {}
        }
        assert_consistent(&world);
    }
}

/// Test: values survive other entities being swap-removed around them.
#[test]
fn test_values_follow_their_entity() {
    let mut world = setup(32);
    let entities: Vec<Entity> = (0..10).map(|_| world.create_entity().unwrap()).collect();
    for (i, &e) in entities.iter().enumerate() {
        world.add_component(e, Armor(i as u16)).unwrap();
    }

    for &e in entities.iter().step_by(3) {
        world.remove_component::<Armor>(e).unwrap();
    }

    for (i, &e) in entities.iter().enumerate() {
        if i % 3 == 0 {
            assert!(!world.has_component::<Armor>(e));
        } else {
            assert_eq!(*world.get_component::<Armor>(e).unwrap(), Armor(i as u16));
        }
    }
    assert_eq!(world.store::<Armor>().unwrap().len(), 6);
}

/// Test: add then get round-trips, remove then get fails.
#[test]
fn test_round_trip() {
    let mut world = setup(4);
    let e = world.create_entity().unwrap();
    let value = Health { max: 80, current: 42 };

    world.add_component(e, value).unwrap();
    assert_eq!(*world.get_component::<Health>(e).unwrap(), value);

    assert_eq!(world.remove_component::<Health>(e).unwrap(), value);
    assert_eq!(
        world.get_component::<Health>(e),
        Err(EcsError::MissingComponent {
            entity: e,
            component: std::any::type_name::<Health>(),
        })
    );
}

/// Test: a recycled handle carries nothing from its previous life.
#[test]
fn test_handle_reuse_starts_empty() {
    let mut world = setup(1);
    let e = world.create_entity().unwrap();
    world.add_component(e, Health { max: 1, current: 1 }).unwrap();
    world.add_component(e, Status { alive: true }).unwrap();
    world.add_component(e, Armor(3)).unwrap();
    world.destroy_entity(e).unwrap();

    let e2 = world.create_entity().unwrap();
    assert_eq!(e2, e);
    assert!(world.signature(e2).unwrap().is_empty());
    assert!(!world.has_component::<Health>(e2));
    assert!(!world.has_component::<Status>(e2));
    assert!(!world.has_component::<Armor>(e2));
    assert!(!world.interest_set::<SystemA>().unwrap().contains(&e2));
    assert!(world.interest_set::<Everything>().unwrap().contains(&e2));
    assert_consistent(&world);
}

/// Test: creation succeeds up to the ceiling, fails past it, recovers after a destroy.
#[test]
fn test_capacity_boundary() {
    let mut world = World::new();
    assert_eq!(world.capacity(), MAX_ENTITY_COUNT);

    let mut last = None;
    for _ in 0..MAX_ENTITY_COUNT {
        last = Some(world.create_entity().unwrap());
    }
    assert_eq!(
        world.create_entity(),
        Err(EcsError::EntityCapacityExceeded { capacity: MAX_ENTITY_COUNT })
    );

    let last = last.unwrap();
    world.destroy_entity(last).unwrap();
    assert_eq!(world.create_entity().unwrap(), last);
    assert_eq!(world.alive_count(), MAX_ENTITY_COUNT);
}

/// Test: tracking declared after entities exist re-scans them.
#[test]
fn test_late_tracking_rescans() {
    #[derive(Default)]
    struct Late;

    impl System for Late {
        fn update(
            &mut self,
            _world: &mut World,
            _entities: &[Entity],
            _delta_time: f32,
        ) -> EcsResult<()> {
            Ok(())
        }
    }

    let mut world = setup(8);
    let armored = world.create_entity().unwrap();
    world.add_component(armored, Armor(5)).unwrap();
    let bare = world.create_entity().unwrap();

    world.register_system::<Late>().unwrap();
    assert_eq!(world.interest_set::<Late>().unwrap().len(), 2);

    world.track_component::<Late, Armor>().unwrap();
    let members: Vec<Entity> = world.interest_set::<Late>().unwrap().iter().copied().collect();
    assert_eq!(members, vec![armored]);
    assert!(!world.interest_set::<Late>().unwrap().contains(&bare));
}

/// Test: contract violations carry the entity and type involved.
#[test]
fn test_violations_are_reported() {
    #[derive(Clone, Copy, Default)]
    struct Unknown;
    impl Component for Unknown {}

    let mut world = setup(2);
    let e = world.create_entity().unwrap();
    world.add_component(e, Armor(1)).unwrap();

    assert_eq!(
        world.add_component(e, Armor(2)),
        Err(EcsError::DuplicateComponent {
            entity: e,
            component: std::any::type_name::<Armor>(),
        })
    );
    assert_eq!(
        world.add_component(e, Unknown),
        Err(EcsError::UnregisteredComponent {
            component: std::any::type_name::<Unknown>(),
        })
    );
    assert!(matches!(
        world.track_component::<SystemA, Unknown>(),
        Err(EcsError::UnregisteredComponent { .. })
    ));
    assert_eq!(
        world.destroy_entity(Entity::from_raw(9)),
        Err(EcsError::EntityOutOfRange {
            entity: Entity::from_raw(9),
            capacity: 2,
        })
    );
    assert!(matches!(
        world.remove_component::<Status>(e),
        Err(EcsError::MissingComponent { .. })
    ));
    // Failed calls leave no trace.
    assert_eq!(*world.get_component::<Armor>(e).unwrap(), Armor(1));
    assert_consistent(&world);
}
