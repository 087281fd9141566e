//! Falling system - advances pickups down the board and drops the ones that leave it

use hecs::{Entity, World};

use crate::components::{Falling, Position};

/// Move every falling entity by its speed. Entities that reach the bottom
/// edge are despawned; returns how many were removed.
pub fn falling_system(world: &mut World) -> usize {
    let mut off_board: Vec<Entity> = Vec::new();

    for (entity, (pos, falling)) in world.query_mut::<(&mut Position, &Falling)>() {
        pos.y += falling.speed;
        if pos.is_off_board() {
            off_board.push(entity);
        }
    }

    for entity in &off_board {
        let _ = world.despawn(*entity);
    }
    off_board.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_fall_and_leave() {
        let mut world = World::new();
        let slow = world.spawn((Position::new(20.0, 10.0), Falling { speed: 0.8 }));
        let edge = world.spawn((Position::new(40.0, 99.5), Falling { speed: 1.0 }));

        let removed = falling_system(&mut world);

        assert_eq!(removed, 1);
        assert!(!world.contains(edge));
        let pos = world.get::<&Position>(slow).unwrap();
        assert!((pos.y - 10.8).abs() < 1e-4);
    }

    #[test]
    fn test_static_entities_untouched() {
        let mut world = World::new();
        let marker = world.spawn((Position::new(50.0, 50.0),));
        assert_eq!(falling_system(&mut world), 0);
        assert_eq!(world.get::<&Position>(marker).unwrap().y, 50.0);
    }
}
