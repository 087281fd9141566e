//! Spawn system - releases water drops and hazards on their timers

use hecs::{Entity, World};
use rand::Rng;
use wellnest_logic::config::HydrationConfig;
use wellnest_logic::constants::hydration::EDGE_MARGIN;
use wellnest_logic::hydration::PickupKind;

use crate::components::{Falling, Pickup, Position, SpawnOrder};

/// Last release time of each spawn stream, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnTimers {
    pub last_drop_ms: u64,
    pub last_hazard_ms: u64,
    next_order: u64,
}

impl SpawnTimers {
    /// Both streams count from `now_ms`.
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            last_drop_ms: now_ms,
            last_hazard_ms: now_ms,
            next_order: 0,
        }
    }

    fn take_order(&mut self) -> SpawnOrder {
        let order = SpawnOrder(self.next_order);
        self.next_order += 1;
        order
    }
}

/// Spawn `kind` at an explicit board position.
pub fn spawn_pickup(
    world: &mut World,
    timers: &mut SpawnTimers,
    kind: PickupKind,
    x: f32,
    y: f32,
    config: &HydrationConfig,
) -> Entity {
    world.spawn((
        Position::new(x, y),
        Falling {
            speed: kind.fall_speed(config),
        },
        Pickup { kind },
        timers.take_order(),
    ))
}

/// Release a water drop and/or a hazard at the top of the board when their
/// intervals have elapsed. Returns the kinds spawned this frame.
pub fn spawn_system<R: Rng>(
    world: &mut World,
    timers: &mut SpawnTimers,
    now_ms: u64,
    rng: &mut R,
    config: &HydrationConfig,
) -> Vec<PickupKind> {
    let mut spawned = Vec::new();

    if now_ms.saturating_sub(timers.last_drop_ms) >= config.drop_interval_ms {
        let x = random_column(rng);
        spawn_pickup(world, timers, PickupKind::WaterDrop, x, 0.0, config);
        timers.last_drop_ms = now_ms;
        spawned.push(PickupKind::WaterDrop);
    }

    if now_ms.saturating_sub(timers.last_hazard_ms) >= config.hazard_interval_ms {
        let kind = PickupKind::HAZARDS[rng.gen_range(0..PickupKind::HAZARDS.len())];
        let x = random_column(rng);
        spawn_pickup(world, timers, kind, x, 0.0, config);
        timers.last_hazard_ms = now_ms;
        spawned.push(kind);
    }

    spawned
}

fn random_column<R: Rng>(rng: &mut R) -> f32 {
    rng.gen_range(EDGE_MARGIN..100.0 - EDGE_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_streams_follow_their_intervals() {
        let config = HydrationConfig::default();
        let mut world = World::new();
        let mut timers = SpawnTimers::starting_at(0);
        let mut rng = StdRng::seed_from_u64(7);

        assert!(spawn_system(&mut world, &mut timers, 1000, &mut rng, &config).is_empty());

        let first = spawn_system(&mut world, &mut timers, 1500, &mut rng, &config);
        assert_eq!(first, vec![PickupKind::WaterDrop]);

        let second = spawn_system(&mut world, &mut timers, 2500, &mut rng, &config);
        assert_eq!(second.len(), 1);
        assert!(second[0].is_hazard());

        assert_eq!(world.len(), 2);
    }

    #[test]
    fn test_spawn_order_counts_spawns_not_frames() {
        let config = HydrationConfig::default();
        let mut world = World::new();
        let mut timers = SpawnTimers::starting_at(0);
        let mut rng = StdRng::seed_from_u64(3);

        // drop and hazard released in the same frame still get distinct orders
        let both = spawn_system(&mut world, &mut timers, 3000, &mut rng, &config);
        assert_eq!(both.len(), 2);
        let manual = spawn_pickup(&mut world, &mut timers, PickupKind::Coffee, 40.0, 10.0, &config);

        let mut orders: Vec<u64> = world
            .query::<&SpawnOrder>()
            .iter()
            .map(|(_, order)| order.0)
            .collect();
        orders.sort_unstable();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(world.get::<&SpawnOrder>(manual).unwrap().0, 2);
    }

    #[test]
    fn test_spawned_pickups_start_at_top_inside_margin() {
        let config = HydrationConfig::default();
        let mut world = World::new();
        let mut timers = SpawnTimers::starting_at(0);
        let mut rng = StdRng::seed_from_u64(99);

        let mut now = 0;
        for _ in 0..50 {
            now += 2500;
            spawn_system(&mut world, &mut timers, now, &mut rng, &config);
        }

        for (_, (pos, falling, pickup)) in world.query::<(&Position, &Falling, &Pickup)>().iter() {
            assert_eq!(pos.y, 0.0);
            assert!(pos.x >= 5.0 && pos.x < 95.0);
            assert_eq!(falling.speed, pickup.kind.fall_speed(&config));
        }
    }
}
