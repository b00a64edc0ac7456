//! A scattered star field behind the playfield.

use bevy::prelude::*;
use rand::Rng;

use super::settings::Settings;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(PostStartup, spawn_star_field);
}

/// Screen area per star, in square pixels.
const PIXELS_PER_STAR: f32 = 6000.0;

/// Stars are placed over a generous area so resizing the window never
/// uncovers empty space.
const STAR_FIELD_SCALE: f32 = 2.0;

#[derive(Component)]
struct Star;

/// Random positions for a star field covering `area`, centered on the origin.
pub fn star_positions(area: Vec2, rng: &mut impl Rng) -> Vec<Vec2> {
    let count = (area.x * area.y / PIXELS_PER_STAR).max(0.0) as usize;
    let half = area / 2.0;
    if half.x <= 0.0 || half.y <= 0.0 {
        return Vec::new();
    }

    (0..count)
        .map(|_| {
            Vec2::new(
                rng.random_range(-half.x..half.x),
                rng.random_range(-half.y..half.y),
            )
        })
        .collect()
}

fn spawn_star_field(mut commands: Commands, settings: Res<Settings>) {
    let mut rng = rand::rng();
    let area = settings.screen_size() * STAR_FIELD_SCALE;
    let positions = star_positions(area, &mut rng);

    commands
        .spawn((
            Name::new("Star Field"),
            Transform::default(),
            Visibility::default(),
        ))
        .with_children(|parent| {
            for position in &positions {
                let size = rng.random_range(1.0..3.0);
                let shade = rng.random_range(0.55..0.8);
                parent.spawn((
                    Name::new("Star"),
                    Star,
                    Sprite::from_color(Color::srgb(shade, shade, shade + 0.1), Vec2::splat(size)),
                    // Z=-1 to be behind everything else
                    Transform::from_translation(position.extend(-1.0)),
                ));
            }
        });

    info!("Spawned {} background stars", positions.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_positions_stay_in_area() {
        let mut rng = rand::rng();
        let area = Vec2::new(1200.0, 800.0);
        let stars = star_positions(area, &mut rng);
        assert_eq!(stars.len(), 160);
        for star in stars {
            assert!(star.x.abs() <= 600.0 && star.y.abs() <= 400.0);
        }
    }

    #[test]
    fn test_no_stars_for_empty_area() {
        let mut rng = rand::rng();
        assert!(star_positions(Vec2::ZERO, &mut rng).is_empty());
    }
}
