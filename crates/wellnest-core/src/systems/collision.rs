//! Collision system - resolves pickups touching the player

use hecs::{Entity, World};
use wellnest_logic::config::HydrationConfig;
use wellnest_logic::hydration::{collides, BoardPoint, PickupKind};

use crate::components::{Pickup, Position, SpawnOrder};

/// Despawn every pickup touching `player` and return what was caught,
/// oldest spawn first.
pub fn collision_system(
    world: &mut World,
    player: BoardPoint,
    config: &HydrationConfig,
) -> Vec<PickupKind> {
    let mut caught: Vec<(SpawnOrder, Entity, PickupKind)> = world
        .query::<(&Position, &Pickup, &SpawnOrder)>()
        .iter()
        .filter(|(_, (pos, _, _))| collides(player, pos.point(), config))
        .map(|(entity, (_, pickup, order))| (*order, entity, pickup.kind))
        .collect();
    caught.sort_by_key(|(order, _, _)| *order);

    caught
        .into_iter()
        .map(|(_, entity, kind)| {
            let _ = world.despawn(entity);
            kind
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(world: &mut World, kind: PickupKind, x: f32, y: f32, order: u64) -> Entity {
        world.spawn((Position::new(x, y), Pickup { kind }, SpawnOrder(order)))
    }

    #[test]
    fn test_only_touching_pickups_are_caught() {
        let config = HydrationConfig::default();
        let mut world = World::new();
        let near = spawn(&mut world, PickupKind::WaterDrop, 52.0, 78.0, 1);
        let far = spawn(&mut world, PickupKind::Soda, 10.0, 20.0, 0);

        let caught = collision_system(&mut world, BoardPoint::new(50.0, 80.0), &config);

        assert_eq!(caught, vec![PickupKind::WaterDrop]);
        assert!(!world.contains(near));
        assert!(world.contains(far));
    }

    #[test]
    fn test_catch_order_follows_spawn_order() {
        let config = HydrationConfig::default();
        let mut world = World::new();
        spawn(&mut world, PickupKind::WaterDrop, 50.0, 80.0, 7);
        spawn(&mut world, PickupKind::Coffee, 51.0, 80.0, 3);

        let caught = collision_system(&mut world, BoardPoint::new(50.0, 80.0), &config);
        assert_eq!(caught, vec![PickupKind::Coffee, PickupKind::WaterDrop]);
        assert_eq!(world.len(), 0);
    }
}
