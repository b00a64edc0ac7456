//! The game's menus and transitions between them.

mod main;
mod pause;

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.init_state::<Menu>();

    app.add_plugins((main::plugin, pause::plugin));
}

/// The game starts on the main menu; it closes while a game is running.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Menu {
    None,
    #[default]
    Main,
    Pause,
}
