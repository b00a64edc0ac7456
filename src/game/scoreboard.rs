//! Scoreboard overlay: score, high score, level and remaining ships.

use bevy::prelude::*;

use super::{settings::Settings, stats::GameStats};
use crate::theme::palette::HUD_TEXT;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_scoreboard);
    app.add_systems(
        Update,
        (update_score_labels, update_ship_icons).run_if(resource_changed::<GameStats>),
    );
}

/// Size of a ship icon relative to the real ship.
const SHIP_ICON_SCALE: f32 = 0.5;

#[derive(Component)]
struct ScoreLabel;

#[derive(Component)]
struct HighScoreLabel;

#[derive(Component)]
struct LevelLabel;

/// Container holding one icon per remaining ship.
#[derive(Component)]
struct ShipIcons;

/// Round a score to the nearest ten and add thousands separators.
pub fn format_score(score: u32) -> String {
    let rounded = (score as u64 + 5) / 10 * 10;
    let digits = rounded.to_string();

    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }
    formatted
}

fn hud_text(text: String, size: f32) -> impl Bundle {
    (
        Text(text),
        TextFont::from_font_size(size),
        TextColor(HUD_TEXT),
    )
}

fn spawn_scoreboard(mut commands: Commands, stats: Res<GameStats>) {
    commands.spawn((
        Name::new("Scoreboard"),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            padding: UiRect::all(Val::Px(20.0)),
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::FlexStart,
            ..default()
        },
        Pickable::IGNORE,
        GlobalZIndex(1),
        children![
            (
                Name::new("Ship Icons"),
                ShipIcons,
                Node {
                    flex_direction: FlexDirection::Row,
                    column_gap: Val::Px(10.0),
                    min_width: Val::Px(150.0),
                    ..default()
                },
            ),
            (
                Name::new("High Score"),
                HighScoreLabel,
                hud_text(format_score(stats.high_score), 48.0),
            ),
            (
                Name::new("Score Column"),
                Node {
                    flex_direction: FlexDirection::Column,
                    align_items: AlignItems::FlexEnd,
                    min_width: Val::Px(150.0),
                    ..default()
                },
                children![
                    (
                        Name::new("Score"),
                        ScoreLabel,
                        hud_text(format_score(stats.score), 48.0),
                    ),
                    (
                        Name::new("Level"),
                        LevelLabel,
                        hud_text(stats.level.to_string(), 36.0),
                    ),
                ],
            ),
        ],
    ));
}

fn update_score_labels(
    stats: Res<GameStats>,
    mut score: Single<&mut Text, (With<ScoreLabel>, Without<HighScoreLabel>, Without<LevelLabel>)>,
    mut high_score: Single<&mut Text, (With<HighScoreLabel>, Without<LevelLabel>)>,
    mut level: Single<&mut Text, With<LevelLabel>>,
) {
    score.0 = format_score(stats.score);
    high_score.0 = format_score(stats.high_score);
    level.0 = stats.level.to_string();
}

/// Rebuild the row of ship icons when the number of ships changes.
fn update_ship_icons(
    mut commands: Commands,
    stats: Res<GameStats>,
    settings: Res<Settings>,
    container: Single<(Entity, Option<&Children>), With<ShipIcons>>,
) {
    let (container, children) = *container;
    let shown = children.map_or(0, |children| children.len());
    if shown == stats.ships_left as usize {
        return;
    }

    let size = settings.ship_size() * SHIP_ICON_SCALE;
    let color = settings.ship_color();
    commands
        .entity(container)
        .despawn_related::<Children>()
        .with_children(|parent| {
            for _ in 0..stats.ships_left {
                parent.spawn((
                    Name::new("Ship Icon"),
                    Node {
                        width: Val::Px(size.x),
                        height: Val::Px(size.y),
                        ..default()
                    },
                    BackgroundColor(color),
                ));
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_rounds_to_tens() {
        assert_eq!(format_score(0), "0");
        assert_eq!(format_score(4), "0");
        assert_eq!(format_score(5), "10");
        assert_eq!(format_score(168), "170");
    }

    #[test]
    fn test_format_score_groups_thousands() {
        assert_eq!(format_score(1_000), "1,000");
        assert_eq!(format_score(12_345), "12,350");
        assert_eq!(format_score(1_234_560), "1,234,560");
        assert_eq!(format_score(999_999), "1,000,000");
    }
}
