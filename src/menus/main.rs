//! The main menu (seen while no game is running).
//!
//! Play starts a game; the difficulty buttons pick the starting level.

use bevy::prelude::*;

use crate::{
    game::{
        settings::{Difficulty, Settings},
        state::{StartGame, apply_difficulty},
        stats::GameStats,
    },
    menus::Menu,
    theme::{interaction::InteractionPalette, widget},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Main), spawn_main_menu);
    app.add_systems(
        Update,
        update_difficulty_buttons
            .run_if(in_state(Menu::Main).and(resource_changed::<Settings>)),
    );
}

/// Marker for a button that selects a difficulty.
#[derive(Component, Debug, Clone, Copy)]
struct DifficultyButton(Difficulty);

fn spawn_main_menu(mut commands: Commands, settings: Res<Settings>) {
    commands
        .spawn((
            widget::ui_root("Main Menu"),
            GlobalZIndex(2),
            DespawnOnExit(Menu::Main),
        ))
        .with_children(|parent| {
            parent.spawn(widget::header("Alien Invasion"));
            parent.spawn(widget::button(
                "Play",
                settings.play_button_color(),
                start_game,
            ));
            for difficulty in Difficulty::ALL {
                parent.spawn(widget::button_with(
                    difficulty.label(),
                    settings.button_color(difficulty),
                    DifficultyButton(difficulty),
                    select_difficulty,
                ));
            }
        });
}

fn start_game(_: On<Pointer<Click>>, mut start_events: MessageWriter<StartGame>) {
    start_events.write(StartGame);
}

fn select_difficulty(
    trigger: On<Pointer<Click>>,
    button_query: Query<&DifficultyButton>,
    mut settings: ResMut<Settings>,
    mut stats: ResMut<GameStats>,
) {
    if stats.game_active {
        return;
    }
    if let Ok(button) = button_query.get(trigger.entity) {
        apply_difficulty(&mut settings, &mut stats, button.0);
        info!(
            "Difficulty set to {} (level {})",
            button.0.label(),
            stats.level
        );
    }
}

/// Highlight the selected difficulty.
fn update_difficulty_buttons(
    settings: Res<Settings>,
    mut buttons: Query<(&DifficultyButton, &mut InteractionPalette)>,
) {
    for (button, mut palette) in &mut buttons {
        let wanted = InteractionPalette::from_base(settings.button_color(button.0));
        if *palette != wanted {
            *palette = wanted;
        }
    }
}
