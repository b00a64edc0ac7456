//! Collision detection between bullets, aliens and the ship.
//!
//! Every collidable entity carries a [`Hitbox`]; overlaps are plain
//! axis-aligned bounding box tests.

use bevy::{
    math::bounding::{Aabb2d, IntersectsVolume},
    prelude::*,
};
use std::{collections::HashSet, hash::Hash};

use super::{GameSystems, bullet::Bullet, fleet::Alien, ship::Ship};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Hitbox>();
    app.add_message::<AliensDestroyed>();
    app.add_message::<FleetCleared>();
    app.add_message::<ShipHit>();

    app.add_systems(
        Update,
        (check_bullet_alien_collisions, check_ship_alien_collisions)
            .chain()
            .in_set(GameSystems::Collision),
    );
}

/// Message sent when bullets destroy aliens.
#[derive(Message, Debug, Clone)]
pub struct AliensDestroyed {
    pub count: u32,
}

/// Message sent when the last alien of the fleet is destroyed.
#[derive(Message, Debug, Clone)]
pub struct FleetCleared;

/// Message sent when an alien rams the ship or reaches the bottom.
#[derive(Message, Debug, Clone)]
pub struct ShipHit;

/// Size of an entity's bounding box, centered on its translation.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Hitbox(pub Vec2);

impl Hitbox {
    pub fn aabb(&self, translation: Vec3) -> Aabb2d {
        Aabb2d::new(translation.truncate(), self.0 / 2.0)
    }
}

/// Work out which bullets and aliens are destroyed this frame.
///
/// Each bullet removes every remaining alien it overlaps. An alien already
/// removed by an earlier bullet no longer stops later bullets.
pub fn resolve_hits<B, A>(bullets: &[(B, Aabb2d)], aliens: &[(A, Aabb2d)]) -> (Vec<B>, HashSet<A>)
where
    B: Copy,
    A: Copy + Eq + Hash,
{
    let mut spent_bullets = Vec::new();
    let mut destroyed = HashSet::new();

    for (bullet, bullet_box) in bullets {
        let mut hit = false;
        for (alien, alien_box) in aliens {
            if !destroyed.contains(alien) && bullet_box.intersects(alien_box) {
                destroyed.insert(*alien);
                hit = true;
            }
        }
        if hit {
            spent_bullets.push(*bullet);
        }
    }

    (spent_bullets, destroyed)
}

/// Remove bullets and the aliens they hit.
pub(super) fn check_bullet_alien_collisions(
    mut commands: Commands,
    bullets: Query<(Entity, &Transform, &Hitbox), With<Bullet>>,
    aliens: Query<(Entity, &Transform, &Hitbox), With<Alien>>,
    mut destroyed_events: MessageWriter<AliensDestroyed>,
    mut cleared_events: MessageWriter<FleetCleared>,
) {
    let bullet_boxes: Vec<_> = bullets
        .iter()
        .map(|(entity, transform, hitbox)| (entity, hitbox.aabb(transform.translation)))
        .collect();
    let alien_boxes: Vec<_> = aliens
        .iter()
        .map(|(entity, transform, hitbox)| (entity, hitbox.aabb(transform.translation)))
        .collect();

    let (spent_bullets, destroyed) = resolve_hits(&bullet_boxes, &alien_boxes);
    if destroyed.is_empty() {
        return;
    }

    for bullet in spent_bullets {
        commands.entity(bullet).despawn();
    }
    for &alien in &destroyed {
        commands.entity(alien).despawn();
    }

    destroyed_events.write(AliensDestroyed {
        count: destroyed.len() as u32,
    });

    if destroyed.len() == alien_boxes.len() {
        info!("Fleet destroyed");
        cleared_events.write(FleetCleared);
    }
}

/// Any alien touching the ship costs a life.
fn check_ship_alien_collisions(
    ship: Single<(&Transform, &Hitbox), With<Ship>>,
    aliens: Query<(&Transform, &Hitbox), With<Alien>>,
    mut hit_events: MessageWriter<ShipHit>,
) {
    let (ship_transform, ship_hitbox) = *ship;
    let ship_box = ship_hitbox.aabb(ship_transform.translation);

    if aliens
        .iter()
        .any(|(transform, hitbox)| hitbox.aabb(transform.translation).intersects(&ship_box))
    {
        info!("Alien collided with the ship");
        hit_events.write(ShipHit);
    }
}
