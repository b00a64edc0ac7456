use bevy::prelude::*;

/// Dark text for the scoreboard on the light playfield
pub const HUD_TEXT: Color = Color::srgb(0.19, 0.19, 0.19);

/// Black text for headers
pub const HEADER_TEXT: Color = Color::srgb(0.1, 0.1, 0.1);

/// White text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(1.0, 1.0, 1.0);

/// Semi-transparent backdrop behind menus
pub const MENU_BACKDROP: Color = Color::srgba(0.9, 0.9, 0.9, 0.6);

/// How much lighter a button gets when hovered
pub const HOVER_LIGHTEN: f32 = 0.08;
/// How much darker a button gets when pressed
pub const PRESS_DARKEN: f32 = 0.08;
