//! Debug helpers.
//!
//! - 'B' ends the current game immediately.
//! - 'F3' toggles hitbox outlines for the ship, bullets and aliens.

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use super::{
    bullet::Bullet,
    collision::Hitbox,
    fleet::Alien,
    ship::Ship,
    state::GameOver,
};
use crate::AppSystems;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<DebugHitboxesVisible>();

    app.add_systems(
        Update,
        (
            force_game_over.run_if(input_just_pressed(KeyCode::KeyB)),
            toggle_hitboxes.run_if(input_just_pressed(KeyCode::F3)),
        )
            .in_set(AppSystems::RecordInput),
    );

    // Draw hitboxes when visible
    app.add_systems(Update, draw_hitboxes.run_if(hitboxes_visible));
}

/// Resource to track if hitbox outlines are visible.
#[derive(Resource, Default)]
pub struct DebugHitboxesVisible(pub bool);

fn hitboxes_visible(debug: Res<DebugHitboxesVisible>) -> bool {
    debug.0
}

fn force_game_over(mut over_events: MessageWriter<GameOver>) {
    info!("Debug: forcing game over");
    over_events.write(GameOver);
}

fn toggle_hitboxes(mut debug: ResMut<DebugHitboxesVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug hitboxes: {}", state);
}

/// Outline every hitbox using Bevy's Gizmos.
fn draw_hitboxes(
    mut gizmos: Gizmos,
    hitboxes: Query<(&Transform, &Hitbox, Has<Ship>, Has<Bullet>, Has<Alien>)>,
) {
    for (transform, hitbox, is_ship, is_bullet, is_alien) in &hitboxes {
        let color = if is_ship {
            css::AQUA
        } else if is_bullet {
            css::GOLD
        } else if is_alien {
            css::LIMEGREEN
        } else {
            css::WHITE
        };

        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            hitbox.0,
            color,
        );
    }
}
