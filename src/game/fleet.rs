//! The alien fleet.
//!
//! Aliens are laid out in a grid that fills the top of the screen, leaving
//! room above the ship. The whole fleet marches sideways, and each time it
//! touches a screen edge it drops down and reverses direction.

use bevy::prelude::*;

use super::{
    GameSystems,
    collision::{Hitbox, ShipHit},
    settings::Settings,
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Alien>();

    // The screen size is known once the window exists
    app.add_systems(PostStartup, spawn_initial_fleet);

    app.add_systems(Update, update_fleet.in_set(GameSystems::Movement));
    app.add_systems(Update, check_aliens_bottom.in_set(GameSystems::Collision));
}

/// Marker component for an alien of the fleet.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Alien;

/// Convert a point from screen space (origin top-left, y down) to world
/// space (origin center, y up).
pub fn screen_to_world(point: Vec2, screen: Vec2) -> Vec2 {
    Vec2::new(point.x - screen.x / 2.0, screen.y / 2.0 - point.y)
}

/// Compute the world-space centers of every alien in a fresh fleet.
///
/// Aliens are spaced one alien width apart horizontally and one alien
/// height apart vertically, with a one-alien margin at the sides and top
/// and room for the ship plus two rows at the bottom.
pub fn fleet_layout(screen: Vec2, alien: Vec2, ship_height: f32) -> Vec<Vec2> {
    if alien.x <= 0.0 || alien.y <= 0.0 {
        return Vec::new();
    }

    let available_space_x = screen.x - 2.0 * alien.x;
    let columns = (available_space_x / (2.0 * alien.x)).floor().max(0.0) as u32;

    let available_space_y = screen.y - 3.0 * alien.y - ship_height;
    let rows = (available_space_y / (2.0 * alien.y)).floor().max(0.0) as u32;

    (0..rows)
        .flat_map(|row| (0..columns).map(move |column| (row, column)))
        .map(|(row, column)| {
            let left = alien.x + 2.0 * alien.x * column as f32;
            let top = alien.y + 2.0 * alien.y * row as f32;
            screen_to_world(Vec2::new(left, top) + alien / 2.0, screen)
        })
        .collect()
}

/// Does an alien centered at `x` touch the edge the fleet is heading for?
///
/// Only the edge in the direction of travel counts, so a fleet that has
/// just reversed is not bounced again while it is still overlapping.
pub fn touches_edge(x: f32, half_width: f32, screen_width: f32, direction: f32) -> bool {
    let edge = screen_width / 2.0;
    if direction > 0.0 {
        x + half_width >= edge
    } else {
        x - half_width <= -edge
    }
}

/// Has an alien centered at `y` reached the bottom of the screen?
pub fn reached_bottom(y: f32, half_height: f32, screen_height: f32) -> bool {
    y - half_height <= -screen_height / 2.0
}

/// Spawn a new fleet. Returns the number of aliens spawned.
pub fn spawn_fleet(commands: &mut Commands, settings: &Settings) -> usize {
    let size = settings.alien_size();
    let positions = fleet_layout(settings.screen_size(), size, settings.ship_height);

    for position in &positions {
        commands.spawn((
            Name::new("Alien"),
            Alien,
            Hitbox(size),
            Sprite::from_color(settings.alien_color(), size),
            Transform::from_translation(position.extend(1.0)),
        ));
    }

    info!("Spawned fleet of {} aliens", positions.len());
    positions.len()
}

fn spawn_initial_fleet(mut commands: Commands, settings: Res<Settings>) {
    spawn_fleet(&mut commands, &settings);
}

/// Advance the fleet by one frame.
///
/// If any alien touches the edge it is heading for, every alien drops by
/// `fleet_drop_speed` and the direction flips before the sideways march.
/// Returns `true` if the fleet bounced.
pub fn step_fleet(
    positions: &mut [Vec3],
    direction: &mut f32,
    settings: &Settings,
    delta_secs: f32,
) -> bool {
    let half_width = settings.alien_width / 2.0;
    let bounced = positions
        .iter()
        .any(|p| touches_edge(p.x, half_width, settings.screen_width, *direction));

    if bounced {
        for position in positions.iter_mut() {
            position.y -= settings.fleet_drop_speed;
        }
        *direction *= -1.0;
    }

    let dx = settings.alien_speed * *direction * delta_secs;
    for position in positions.iter_mut() {
        position.x += dx;
    }
    bounced
}

/// Bounce the fleet off the screen edges, then march it sideways.
fn update_fleet(
    time: Res<Time>,
    mut settings: ResMut<Settings>,
    mut aliens: Query<&mut Transform, With<Alien>>,
) {
    let mut positions: Vec<Vec3> = aliens.iter().map(|t| t.translation).collect();
    let mut direction = settings.fleet_direction;

    if step_fleet(&mut positions, &mut direction, &settings, time.delta_secs()) {
        debug!("Fleet reversed, now heading {}", direction);
    }
    settings.fleet_direction = direction;

    for (mut transform, position) in aliens.iter_mut().zip(positions) {
        transform.translation = position;
    }
}

/// An alien reaching the bottom counts the same as hitting the ship.
fn check_aliens_bottom(
    settings: Res<Settings>,
    aliens: Query<&Transform, With<Alien>>,
    mut hit_events: MessageWriter<ShipHit>,
) {
    let half_height = settings.alien_height / 2.0;
    if aliens
        .iter()
        .any(|t| reached_bottom(t.translation.y, half_height, settings.screen_height))
    {
        info!("An alien reached the bottom of the screen");
        hit_events.write(ShipHit);
    }
}
