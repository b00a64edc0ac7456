//! Bullets fired by the ship.
//!
//! A bullet travels straight up until it hits an alien or leaves the top
//! of the screen. Only a few may be in flight at once.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use super::{
    GameSystems, RespawnDelay,
    collision::Hitbox,
    settings::Settings,
    ship::Ship,
    stats::game_active,
};
use crate::{AppSystems, PausableSystems};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Bullet>();

    app.add_systems(
        Update,
        fire_bullet
            .in_set(AppSystems::RecordInput)
            .in_set(PausableSystems)
            .run_if(game_active.and(RespawnDelay::is_over))
            .run_if(input_just_pressed(KeyCode::Space)),
    );
    app.add_systems(
        Update,
        (move_bullets, despawn_offscreen_bullets)
            .chain()
            .in_set(GameSystems::Movement),
    );
}

/// Marker component for a bullet in flight.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Bullet;

/// Whether another bullet may be fired.
pub fn can_fire(in_flight: usize, allowed: usize) -> bool {
    in_flight < allowed
}

/// Has a bullet centered at `y` completely left the top of the screen?
pub fn is_off_screen(y: f32, half_height: f32, screen_height: f32) -> bool {
    y - half_height >= screen_height / 2.0
}

/// Fire a bullet from the tip of the ship if the limit allows it.
fn fire_bullet(
    mut commands: Commands,
    settings: Res<Settings>,
    ship: Single<&Transform, With<Ship>>,
    bullets: Query<(), With<Bullet>>,
) {
    if !can_fire(bullets.iter().count(), settings.bullets_allowed) {
        return;
    }

    let size = settings.bullet_size();
    let ship_top = ship.translation.y + settings.ship_height / 2.0;
    let position = Vec2::new(ship.translation.x, ship_top - size.y / 2.0);

    commands.spawn((
        Name::new("Bullet"),
        Bullet,
        Hitbox(size),
        Sprite::from_color(settings.bullet_color(), size),
        Transform::from_translation(position.extend(3.0)),
    ));
    debug!("Fired bullet at {:?}", position);
}

fn move_bullets(
    time: Res<Time>,
    settings: Res<Settings>,
    mut bullets: Query<&mut Transform, With<Bullet>>,
) {
    let dy = settings.bullet_speed * time.delta_secs();
    for mut transform in &mut bullets {
        transform.translation.y += dy;
    }
}

fn despawn_offscreen_bullets(
    mut commands: Commands,
    settings: Res<Settings>,
    bullets: Query<(Entity, &Transform), With<Bullet>>,
) {
    let half_height = settings.bullet_height / 2.0;
    for (entity, transform) in &bullets {
        if is_off_screen(transform.translation.y, half_height, settings.screen_height) {
            commands.entity(entity).despawn();
        }
    }
}
