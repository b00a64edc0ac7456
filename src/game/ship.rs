//! The player's ship at the bottom of the screen.
//!
//! The ship slides left and right while an arrow key is held and never
//! leaves the screen.

use bevy::prelude::*;

use super::{GameSystems, collision::Hitbox, settings::Settings};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Ship>();

    app.add_systems(PostStartup, spawn_ship);
    app.add_systems(Update, move_ship.in_set(GameSystems::Movement));
}

/// Marker component for the ship entity.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Ship;

/// Where the ship rests: centered at the bottom of the screen.
pub fn ship_home(settings: &Settings) -> Vec2 {
    Vec2::new(0.0, (settings.ship_height - settings.screen_height) / 2.0)
}

/// Move the ship back to the bottom center.
pub fn center_ship(transform: &mut Transform, settings: &Settings) {
    transform.translation = ship_home(settings).extend(transform.translation.z);
}

/// Horizontal input from the arrow keys: -1, 0 or 1.
pub fn steering(keyboard: &ButtonInput<KeyCode>) -> f32 {
    let mut direction = 0.0;
    if keyboard.pressed(KeyCode::ArrowRight) {
        direction += 1.0;
    }
    if keyboard.pressed(KeyCode::ArrowLeft) {
        direction -= 1.0;
    }
    direction
}

/// Move `x` by `dx`, keeping a ship of `half_width` inside the screen.
pub fn clamp_to_screen(x: f32, dx: f32, half_width: f32, screen_width: f32) -> f32 {
    let limit = (screen_width / 2.0 - half_width).max(0.0);
    (x + dx).clamp(-limit, limit)
}

fn spawn_ship(mut commands: Commands, settings: Res<Settings>) {
    let home = ship_home(&settings);
    info!("Spawning ship at {:?}", home);

    commands.spawn((
        Name::new("Ship"),
        Ship,
        Hitbox(settings.ship_size()),
        Sprite::from_color(settings.ship_color(), settings.ship_size()),
        Transform::from_translation(home.extend(2.0)),
    ));
}

fn move_ship(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<Settings>,
    mut ship: Single<&mut Transform, With<Ship>>,
) {
    let dx = steering(&keyboard) * settings.ship_speed * time.delta_secs();
    ship.translation.x = clamp_to_screen(
        ship.translation.x,
        dx,
        settings.ship_width / 2.0,
        settings.screen_width,
    );
    // Follow the floor if the window was resized
    ship.translation.y = ship_home(&settings).y;
}
