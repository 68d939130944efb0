//! # Health / Status Scenario
//!
//! One entity walks through the full lifecycle while a system tracking both
//! component types watches it enter and leave its interest set.

use tessera_core::{Component, EcsError, EcsResult, Entity, System, World};

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

/// Counts how many entities it saw per frame.
#[derive(Default)]
struct SystemA {
    frames: Vec<usize>,
}

impl System for SystemA {
    fn update(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        _delta_time: f32,
    ) -> EcsResult<()> {
        for &e in entities {
            // Tracked types are guaranteed present.
            let _ = world.get_component::<Health>(e)?;
            let _ = world.get_component::<Status>(e)?;
        }
        self.frames.push(entities.len());
        Ok(())
    }
}

#[test]
fn test_health_status_lifecycle() {
    let mut world = World::with_capacity(8).unwrap();
    world.register_component::<Health>().unwrap();
    world.register_component::<Status>().unwrap();
    world.register_system::<SystemA>().unwrap();
    world.track_component::<SystemA, Health>().unwrap();
    world.track_component::<SystemA, Status>().unwrap();

    let e1 = world.create_entity().unwrap();

    world.add_component(e1, Health { max: 100, current: 100 }).unwrap();
    assert!(!world.interest_set::<SystemA>().unwrap().contains(&e1));
    world.update_system::<SystemA>(0.016).unwrap();

    world.add_component(e1, Status { alive: true }).unwrap();
    assert!(world.interest_set::<SystemA>().unwrap().contains(&e1));
    world.update_system::<SystemA>(0.016).unwrap();

    world.remove_component::<Health>(e1).unwrap();
    assert!(!world.interest_set::<SystemA>().unwrap().contains(&e1));
    world.update_system::<SystemA>(0.016).unwrap();

    world.destroy_entity(e1).unwrap();
    let err = world.get_component::<Status>(e1).unwrap_err();
    assert!(matches!(
        err,
        EcsError::MissingComponent { .. } | EcsError::EntityOutOfRange { .. }
    ));

    assert_eq!(world.system::<SystemA>().unwrap().frames, vec![0, 1, 0]);
}

#[test]
fn test_removal_during_update_only_affects_next_frame() {
    /// Strips Status from every member it visits.
    #[derive(Default)]
    struct Stripper {
        visited: usize,
    }

    impl System for Stripper {
        fn update(
            &mut self,
            world: &mut World,
            entities: &[Entity],
            _delta_time: f32,
        ) -> EcsResult<()> {
            for &e in entities {
                world.remove_component::<Status>(e)?;
                self.visited += 1;
            }
            Ok(())
        }
    }

    let mut world = World::with_capacity(8).unwrap();
    world.register_component::<Status>().unwrap();
    world.register_system::<Stripper>().unwrap();
    world.track_component::<Stripper, Status>().unwrap();

    for _ in 0..3 {
        let e = world.create_entity().unwrap();
        world.add_component(e, Status { alive: true }).unwrap();
    }

    world.update_system::<Stripper>(0.0).unwrap();
    assert_eq!(world.system::<Stripper>().unwrap().visited, 3);
    assert!(world.interest_set::<Stripper>().unwrap().is_empty());

    world.update_system::<Stripper>(0.0).unwrap();
    assert_eq!(world.system::<Stripper>().unwrap().visited, 3);
}
