//! # Combat
//!
//! Every combatant attacks one target per round. A combatant whose target
//! dies inherits the victim's target, so the ring shrinks until one
//! combatant is left.
//!
//! Dead combatants are not destroyed mid-round; [`ReaperSystem`] destroys
//! them once [`CombatSystem`] has finished the frame.

use tessera_core::{Component, EcsResult, Entity, System, World};

/// Who to hit and how hard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Combat {
    /// Entity this combatant attacks.
    pub target: Entity,
    /// Damage dealt per hit.
    pub attack_damage: i32,
}

impl Default for Combat {
    fn default() -> Self {
        Self {
            target: Entity::from_raw(0),
            attack_damage: 0,
        }
    }
}

impl Component for Combat {}

/// Hit points.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Health {
    /// Starting hit points.
    pub max: i32,
    /// Remaining hit points, never below zero.
    pub current: i32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub const fn full(max: i32) -> Self {
        Self { max, current: max }
    }
}

impl Component for Health {}

/// Life flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// Cleared on the killing blow.
    pub alive: bool,
}

impl Component for Status {}

/// Deals damage from each combatant to its target.
///
/// Tracks [`Combat`], [`Health`] and [`Status`].
#[derive(Debug, Default)]
pub struct CombatSystem {
    /// Hits landed during the last update.
    pub hits: u32,
    /// Kills during the last update.
    pub kills: u32,
}

impl CombatSystem {
    /// Returns `true` if `target` can still be hit.
    fn is_valid_target(world: &World, attacker: Entity, target: Entity) -> bool {
        target != attacker
            && world.is_alive(target)
            && world.has_component::<Health>(target)
            && world.has_component::<Status>(target)
            && world.get_component::<Status>(target).is_ok_and(|status| status.alive)
    }
}

impl System for CombatSystem {
    fn update(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        _delta_time: f32,
    ) -> EcsResult<()> {
        self.hits = 0;
        self.kills = 0;

        for &attacker in entities {
            if !world.get_component::<Status>(attacker)?.alive {
                continue;
            }

            let combat = *world.get_component::<Combat>(attacker)?;
            if !Self::is_valid_target(world, attacker, combat.target) {
                continue;
            }

            let health = world.get_component_mut::<Health>(combat.target)?;
            health.current = (health.current - combat.attack_damage).max(0);
            let remaining = health.current;
            self.hits += 1;

            tracing::debug!(
                "{attacker} deals [{}] damage to {}. Health remaining - {remaining}",
                combat.attack_damage,
                combat.target
            );

            if remaining > 0 {
                continue;
            }

            world.get_component_mut::<Status>(combat.target)?.alive = false;
            self.kills += 1;
            tracing::info!("The final blow was dealt! {} is dead.", combat.target);

            // Take over the victim's target if it carries one.
            if world.has_component::<Combat>(combat.target) {
                let next = world.get_component::<Combat>(combat.target)?.target;
                world.get_component_mut::<Combat>(attacker)?.target = next;
            }
        }
        Ok(())
    }
}

/// Destroys combatants whose [`Status`] says they are dead.
///
/// Tracks [`Status`].
#[derive(Debug, Default)]
pub struct ReaperSystem {
    /// Entities destroyed during the last update.
    pub reaped: Vec<Entity>,
}

impl System for ReaperSystem {
    fn update(
        &mut self,
        world: &mut World,
        entities: &[Entity],
        _delta_time: f32,
    ) -> EcsResult<()> {
        self.reaped.clear();
        for &e in entities {
            if !world.get_component::<Status>(e)?.alive {
                world.destroy_entity(e)?;
                self.reaped.push(e);
            }
        }
        Ok(())
    }
}

/// Registers the combat components and systems on a world.
///
/// # Errors
///
/// Any registration failure from the world.
pub fn install(world: &mut World) -> EcsResult<()> {
    world.register_component::<Combat>()?;
    world.register_component::<Health>()?;
    world.register_component::<Status>()?;

    world.register_system::<CombatSystem>()?;
    world.track_component::<CombatSystem, Combat>()?;
    world.track_component::<CombatSystem, Health>()?;
    world.track_component::<CombatSystem, Status>()?;

    world.register_system::<ReaperSystem>()?;
    world.track_component::<ReaperSystem, Status>()?;
    Ok(())
}
