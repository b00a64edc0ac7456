//! Game settings - screen, ship, bullet and fleet tuning.
//!
//! The static part can be overridden from an `alien_invasion.json` file.
//! The dynamic part (speeds, points, fleet direction) changes as the
//! player levels up and is never persisted.

use bevy::{
    prelude::*,
    window::{PrimaryWindow, WindowResized},
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Settings>();
    app.register_type::<Difficulty>();

    app.add_systems(Startup, (sync_screen_size, log_settings_source));
    app.add_systems(Update, sync_screen_size.run_if(on_message::<WindowResized>));
}

/// Name of the optional settings file.
const SETTINGS_FILE: &str = "alien_invasion.json";

/// A named difficulty preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// How many levels this difficulty fast-forwards on a new game.
    pub fn levels_skipped(self) -> u32 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 3,
            Difficulty::Hard => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

/// Resource holding every tunable of the game.
#[derive(Resource, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct Settings {
    pub screen_width: f32,
    pub screen_height: f32,
    pub fullscreen: bool,
    pub bg_color: [u8; 3],

    pub ship_width: f32,
    pub ship_height: f32,
    pub ship_limit: u32,
    pub ship_color: [u8; 3],

    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_color: [u8; 3],
    pub bullets_allowed: usize,

    pub alien_width: f32,
    pub alien_height: f32,
    pub alien_color: [u8; 3],
    /// Distance the fleet drops each time it touches an edge.
    pub fleet_drop_speed: f32,

    /// How quickly the game speeds up per level.
    pub speedup_scale: f32,
    /// How quickly alien point values grow per level.
    pub score_scale: f32,

    /// Speeds in pixels per second, before any level speed-up.
    pub base_ship_speed: f32,
    pub base_bullet_speed: f32,
    pub base_alien_speed: f32,
    pub base_alien_points: u32,

    pub difficulty: Difficulty,
    pub play_button_color: [u8; 3],
    pub difficulty_button_color: [u8; 3],
    pub active_difficulty_button_color: [u8; 3],

    #[serde(skip)]
    pub ship_speed: f32,
    #[serde(skip)]
    pub bullet_speed: f32,
    #[serde(skip)]
    pub alien_speed: f32,
    /// 1 moves the fleet right, -1 moves it left.
    #[serde(skip)]
    pub fleet_direction: f32,
    #[serde(skip)]
    pub alien_points: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            screen_width: 1200.0,
            screen_height: 800.0,
            fullscreen: false,
            bg_color: [230, 230, 230],

            ship_width: 60.0,
            ship_height: 48.0,
            ship_limit: 3,
            ship_color: [40, 90, 160],

            bullet_width: 3.0,
            bullet_height: 15.0,
            bullet_color: [60, 60, 60],
            bullets_allowed: 3,

            alien_width: 60.0,
            alien_height: 58.0,
            alien_color: [60, 160, 60],
            fleet_drop_speed: 10.0,

            speedup_scale: 1.1,
            score_scale: 1.5,

            base_ship_speed: 300.0,
            base_bullet_speed: 450.0,
            base_alien_speed: 60.0,
            base_alien_points: 50,

            difficulty: Difficulty::Easy,
            play_button_color: [0, 180, 180],
            difficulty_button_color: [0, 120, 120],
            active_difficulty_button_color: [0, 200, 80],

            ship_speed: 0.0,
            bullet_speed: 0.0,
            alien_speed: 0.0,
            fleet_direction: 1.0,
            alien_points: 0,
        };
        settings.initialize_dynamic_settings();
        settings
    }
}

impl Settings {
    /// Reset the settings that change throughout the game.
    pub fn initialize_dynamic_settings(&mut self) {
        self.ship_speed = self.base_ship_speed;
        self.bullet_speed = self.base_bullet_speed;
        self.alien_speed = self.base_alien_speed;
        self.fleet_direction = 1.0;
        self.alien_points = self.base_alien_points;
    }

    /// Speed everything up and make aliens worth more.
    pub fn increase_speed(&mut self) {
        self.ship_speed *= self.speedup_scale;
        self.bullet_speed *= self.speedup_scale;
        self.alien_speed *= self.speedup_scale;
        self.alien_points = (self.alien_points as f32 * self.score_scale) as u32;
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    pub fn ship_size(&self) -> Vec2 {
        Vec2::new(self.ship_width, self.ship_height)
    }

    pub fn bullet_size(&self) -> Vec2 {
        Vec2::new(self.bullet_width, self.bullet_height)
    }

    pub fn alien_size(&self) -> Vec2 {
        Vec2::new(self.alien_width, self.alien_height)
    }

    pub fn bg_color(&self) -> Color {
        rgb(self.bg_color)
    }

    pub fn ship_color(&self) -> Color {
        rgb(self.ship_color)
    }

    pub fn bullet_color(&self) -> Color {
        rgb(self.bullet_color)
    }

    pub fn alien_color(&self) -> Color {
        rgb(self.alien_color)
    }

    pub fn play_button_color(&self) -> Color {
        rgb(self.play_button_color)
    }

    /// Color of a difficulty button, highlighted when it is the selected one.
    pub fn button_color(&self, difficulty: Difficulty) -> Color {
        if difficulty == self.difficulty {
            rgb(self.active_difficulty_button_color)
        } else {
            rgb(self.difficulty_button_color)
        }
    }

    /// Parse settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.initialize_dynamic_settings();
        Ok(settings)
    }

    /// Candidate locations for the settings file, most specific first.
    fn file_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SETTINGS_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("alien_invasion").join(SETTINGS_FILE));
        }
        paths
    }

    /// Load settings from the first settings file found, or use the defaults.
    ///
    /// This runs before logging is set up, so the outcome is returned as a
    /// [`SettingsSource`] to be logged once the app starts.
    pub fn load() -> (Self, SettingsSource) {
        let Some(path) = Self::file_paths().into_iter().find(|p| p.exists()) else {
            return (Self::default(), SettingsSource::default());
        };

        match Self::read_from(&path) {
            Ok(settings) => (
                settings,
                SettingsSource {
                    path: Some(path),
                    error: None,
                },
            ),
            Err(e) => (
                Self::default(),
                SettingsSource {
                    path: Some(path),
                    error: Some(e),
                },
            ),
        }
    }

    fn read_from(path: &Path) -> Result<Self, String> {
        let contents = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_json(&contents).map_err(|e| e.to_string())
    }
}

/// Where the settings came from, for startup logging.
#[derive(Resource, Debug, Default)]
pub struct SettingsSource {
    pub path: Option<PathBuf>,
    pub error: Option<String>,
}

fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::srgb_u8(r, g, b)
}

fn log_settings_source(source: Res<SettingsSource>, settings: Res<Settings>) {
    match (&source.path, &source.error) {
        (None, _) => info!("No {} found, using default settings", SETTINGS_FILE),
        (Some(path), None) => info!("Loaded settings from {:?}", path),
        (Some(path), Some(e)) => warn!("Failed to load settings from {:?}: {}", path, e),
    }
    info!(
        "Difficulty {}, {} ships, {} bullets allowed",
        settings.difficulty.label(),
        settings.ship_limit,
        settings.bullets_allowed
    );
}

/// Keep the playfield dimensions in step with the real window size.
fn sync_screen_size(
    window: Single<&Window, With<PrimaryWindow>>,
    mut settings: ResMut<Settings>,
) {
    let size = window.size();
    if size.x > 0.0 && size.y > 0.0 && size != settings.screen_size() {
        settings.screen_width = size.x;
        settings.screen_height = size.y;
        info!("Playfield resized to {}x{}", size.x, size.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dynamic_settings() {
        let settings = Settings::default();
        assert_eq!(settings.ship_speed, settings.base_ship_speed);
        assert_eq!(settings.alien_points, 50);
        assert_eq!(settings.fleet_direction, 1.0);
    }

    #[test]
    fn test_increase_speed_scales_speeds_and_points() {
        let mut settings = Settings::default();
        settings.increase_speed();
        assert!((settings.ship_speed - 330.0).abs() < 1e-3);
        assert!((settings.alien_speed - 66.0).abs() < 1e-3);
        assert_eq!(settings.alien_points, 75);

        settings.increase_speed();
        assert_eq!(settings.alien_points, 112);
    }

    #[test]
    fn test_initialize_dynamic_settings_undoes_level_ups() {
        let mut settings = Settings::default();
        settings.increase_speed();
        settings.increase_speed();
        settings.fleet_direction = -1.0;
        settings.initialize_dynamic_settings();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_from_json_keeps_defaults_for_missing_fields() {
        let settings =
            Settings::from_json(r#"{ "ship_limit": 5, "difficulty": "HARD" }"#).unwrap();
        assert_eq!(settings.ship_limit, 5);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.bullets_allowed, 3);
        assert_eq!(settings.alien_speed, settings.base_alien_speed);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(Settings::from_json("not json").is_err());
    }

    #[test]
    fn test_button_color_highlights_selected_difficulty() {
        let mut settings = Settings::default();
        settings.difficulty = Difficulty::Medium;
        assert_eq!(
            settings.button_color(Difficulty::Medium),
            rgb(settings.active_difficulty_button_color)
        );
        assert_eq!(
            settings.button_color(Difficulty::Hard),
            rgb(settings.difficulty_button_color)
        );
    }

    #[test]
    fn test_difficulty_levels_skipped() {
        assert_eq!(Difficulty::Easy.levels_skipped(), 0);
        assert_eq!(Difficulty::Medium.levels_skipped(), 3);
        assert_eq!(Difficulty::Hard.levels_skipped(), 6);
    }
}
