//! The pause menu.

use bevy::prelude::*;

use crate::{Pause, game::settings::Settings, menus::Menu, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Pause), spawn_pause_menu);
}

fn spawn_pause_menu(mut commands: Commands, settings: Res<Settings>) {
    let color = settings.play_button_color();
    commands.spawn((
        widget::ui_root("Pause Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Pause),
        children![
            widget::header("Game Paused"),
            widget::button("Resume", color, resume),
            widget::button("Quit", color, quit),
        ],
    ));
}

fn resume(
    _: On<Pointer<Click>>,
    mut next_pause: ResMut<NextState<Pause>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    next_pause.set(Pause(false));
    next_menu.set(Menu::None);
}

fn quit(_: On<Pointer<Click>>, mut app_exit: MessageWriter<AppExit>) {
    app_exit.write(AppExit::Success);
}
