//! The main game module for Alien Invasion.
//!
//! This module contains all the gameplay logic including:
//! - Settings and difficulty presets
//! - Game statistics and the persisted high score
//! - The ship, its bullets and the alien fleet
//! - Collision detection and resolution
//! - Game flow (start, level-up, ship hit, game over)
//! - The scoreboard overlay

mod background;
mod bullet;
mod collision;
mod debug;
mod fleet;
mod highscore;
mod scoreboard;
pub mod settings;
mod ship;
pub mod state;
pub mod stats;

use bevy::prelude::*;

use crate::{AppSystems, PausableSystems};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<RespawnDelay>();

    // Gameplay runs in three stages each frame. Chaining them makes sure
    // despawns from one stage are applied before the next one looks.
    app.configure_sets(
        Update,
        (
            GameSystems::Movement,
            GameSystems::Collision,
            GameSystems::Resolve,
        )
            .chain()
            .in_set(AppSystems::Update),
    );
    app.configure_sets(
        Update,
        (GameSystems::Movement, GameSystems::Collision)
            .in_set(PausableSystems)
            .run_if(stats::game_active.and(RespawnDelay::is_over)),
    );

    app.add_systems(
        Update,
        tick_respawn_delay
            .in_set(AppSystems::TickTimers)
            .in_set(PausableSystems),
    );

    app.add_plugins((
        settings::plugin,
        stats::plugin,
        highscore::plugin,
        background::plugin,
        ship::plugin,
        bullet::plugin,
        fleet::plugin,
        collision::plugin,
        state::plugin,
        scoreboard::plugin,
        debug::plugin,
    ));
}

/// Stages of a gameplay frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSystems {
    /// Move the ship, bullets and fleet.
    Movement,
    /// Detect overlaps and send messages about them.
    Collision,
    /// React to those messages: score, level-up, ship hit, game over.
    Resolve,
}

/// Short freeze after the ship is hit, so the player can see what happened.
#[derive(Resource, Debug, Default)]
pub struct RespawnDelay(Option<Timer>);

impl RespawnDelay {
    const SECONDS: f32 = 0.5;

    pub fn start(&mut self) {
        self.0 = Some(Timer::from_seconds(Self::SECONDS, TimerMode::Once));
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Run condition: play is not frozen.
    pub fn is_over(delay: Res<RespawnDelay>) -> bool {
        delay.0.is_none()
    }
}

fn tick_respawn_delay(time: Res<Time>, mut delay: ResMut<RespawnDelay>) {
    let Some(timer) = delay.0.as_mut() else {
        return;
    };
    if timer.tick(time.delta()).is_finished() {
        delay.0 = None;
    }
}
