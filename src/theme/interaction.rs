use bevy::{color::Luminance, prelude::*};

use super::palette::{HOVER_LIGHTEN, PRESS_DARKEN};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<InteractionPalette>();
    app.add_systems(Update, apply_interaction_palette);
}

/// Palette for widget interactions. Add this to an entity that supports
/// [`Interaction`]s, such as a button, to change its [`BackgroundColor`] based
/// on the current interaction state.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct InteractionPalette {
    pub none: Color,
    pub hovered: Color,
    pub pressed: Color,
}

impl InteractionPalette {
    /// Derive hover and press shades from a base color.
    pub fn from_base(color: Color) -> Self {
        Self {
            none: color,
            hovered: color.lighter(HOVER_LIGHTEN),
            pressed: color.darker(PRESS_DARKEN),
        }
    }

    pub fn color(&self, interaction: Interaction) -> Color {
        match interaction {
            Interaction::None => self.none,
            Interaction::Hovered => self.hovered,
            Interaction::Pressed => self.pressed,
        }
    }
}

fn apply_interaction_palette(
    mut palette_query: Query<
        (&Interaction, &InteractionPalette, &mut BackgroundColor),
        Or<(Changed<Interaction>, Changed<InteractionPalette>)>,
    >,
) {
    for (interaction, palette, mut background) in &mut palette_query {
        *background = palette.color(*interaction).into();
    }
}
