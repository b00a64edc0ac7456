//! Game flow - starting, levelling up, losing ships and game over.
//!
//! New level: destroy the whole fleet.
//! Lose a ship: an alien touches the ship or reaches the bottom.
//! Game over: no ships left (or the debug key).

use bevy::{
    input::common_conditions::input_just_pressed,
    prelude::*,
    window::{CursorOptions, PrimaryWindow},
};

use super::{
    GameSystems, RespawnDelay,
    bullet::Bullet,
    collision::{AliensDestroyed, FleetCleared, ShipHit},
    fleet::{Alien, spawn_fleet},
    highscore::HighScoreFile,
    settings::{Difficulty, Settings},
    ship::{Ship, center_ship},
    stats::GameStats,
};
use crate::{AppSystems, Pause, menus::Menu};

pub(super) fn plugin(app: &mut App) {
    app.add_message::<StartGame>();
    app.add_message::<GameOver>();

    app.add_systems(
        Update,
        (
            quit.run_if(input_just_pressed(KeyCode::KeyQ)),
            start_or_pause.run_if(input_just_pressed(KeyCode::KeyP)),
            toggle_pause.run_if(input_just_pressed(KeyCode::Escape)),
        )
            .in_set(AppSystems::RecordInput),
    );

    app.add_systems(
        Update,
        (
            update_score,
            start_next_level,
            handle_ship_hit,
            end_game,
            start_game,
        )
            .chain()
            .in_set(GameSystems::Resolve),
    );
}

/// Message to start a new game with the selected difficulty.
#[derive(Message, Debug, Clone)]
pub struct StartGame;

/// Message to end the current game.
#[derive(Message, Debug, Clone)]
pub struct GameOver;

/// Select a difficulty: reset speeds and stats, then fast-forward the
/// level counter, speeding the game up once per skipped level.
pub fn apply_difficulty(settings: &mut Settings, stats: &mut GameStats, difficulty: Difficulty) {
    settings.difficulty = difficulty;
    settings.initialize_dynamic_settings();
    stats.reset_stats(settings.ship_limit, true);
    for _ in 0..difficulty.levels_skipped() {
        advance_level(settings, stats);
    }
}

/// Speed the game up and bump the level.
pub fn advance_level(settings: &mut Settings, stats: &mut GameStats) {
    settings.increase_speed();
    stats.level += 1;
}

/// Mark the game as over and restore the starting speeds.
pub fn finish_game(settings: &mut Settings, stats: &mut GameStats) {
    stats.game_active = false;
    settings.initialize_dynamic_settings();
}

/// Remove every alien and bullet from the playfield.
fn clear_playfield(
    commands: &mut Commands,
    entities: &Query<Entity, Or<(With<Alien>, With<Bullet>)>>,
) {
    for entity in entities {
        commands.entity(entity).despawn();
    }
}

fn quit(mut app_exit: MessageWriter<AppExit>) {
    info!("Quit requested");
    app_exit.write(AppExit::Success);
}

/// P starts a game from the menu, and pauses or resumes one in progress.
fn start_or_pause(
    stats: Res<GameStats>,
    mut start_events: MessageWriter<StartGame>,
    pause: Res<State<Pause>>,
    next_pause: ResMut<NextState<Pause>>,
    next_menu: ResMut<NextState<Menu>>,
) {
    if stats.game_active {
        set_paused(!pause.get().0, next_pause, next_menu);
    } else {
        start_events.write(StartGame);
    }
}

fn toggle_pause(
    stats: Res<GameStats>,
    pause: Res<State<Pause>>,
    next_pause: ResMut<NextState<Pause>>,
    next_menu: ResMut<NextState<Menu>>,
) {
    if stats.game_active {
        set_paused(!pause.get().0, next_pause, next_menu);
    }
}

fn set_paused(
    paused: bool,
    mut next_pause: ResMut<NextState<Pause>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    next_pause.set(Pause(paused));
    next_menu.set(if paused { Menu::Pause } else { Menu::None });
    info!("Game {}", if paused { "paused" } else { "resumed" });
}

/// Award points for destroyed aliens.
fn update_score(
    settings: Res<Settings>,
    mut stats: ResMut<GameStats>,
    mut destroyed_events: MessageReader<AliensDestroyed>,
) {
    for event in destroyed_events.read() {
        let points = stats.record_hits(settings.alien_points, event.count);
        info!(
            "Destroyed {} aliens, +{} points (total: {})",
            event.count, points, stats.score
        );
    }
}

/// Fleet destroyed: new fleet, faster game, next level.
fn start_next_level(
    mut commands: Commands,
    mut cleared_events: MessageReader<FleetCleared>,
    mut settings: ResMut<Settings>,
    mut stats: ResMut<GameStats>,
    entities: Query<Entity, Or<(With<Alien>, With<Bullet>)>>,
) {
    if cleared_events.read().count() == 0 {
        return;
    }

    clear_playfield(&mut commands, &entities);
    spawn_fleet(&mut commands, &settings);
    advance_level(&mut settings, &mut stats);
    info!(
        "Level {}! Alien speed {:.0}, {} points per alien",
        stats.level, settings.alien_speed, settings.alien_points
    );
}

/// Ship hit: lose a life and start over with a fresh fleet, or end the game.
fn handle_ship_hit(
    mut commands: Commands,
    mut hit_events: MessageReader<ShipHit>,
    settings: Res<Settings>,
    mut stats: ResMut<GameStats>,
    mut delay: ResMut<RespawnDelay>,
    mut over_events: MessageWriter<GameOver>,
    entities: Query<Entity, Or<(With<Alien>, With<Bullet>)>>,
    mut ship: Single<&mut Transform, With<Ship>>,
) {
    // Ramming the ship and reaching the bottom in the same frame is one hit
    if hit_events.read().count() == 0 || !stats.game_active {
        return;
    }

    if stats.lose_ship() {
        info!("Ship hit! {} ships left", stats.ships_left);
        clear_playfield(&mut commands, &entities);
        spawn_fleet(&mut commands, &settings);
        center_ship(&mut ship, &settings);
        delay.start();
    } else {
        info!("Ship hit! No ships left");
        over_events.write(GameOver);
    }
}

/// Game over: back to the menu with the cursor visible.
fn end_game(
    mut over_events: MessageReader<GameOver>,
    mut settings: ResMut<Settings>,
    mut stats: ResMut<GameStats>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut next_pause: ResMut<NextState<Pause>>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    high_score_file: Res<HighScoreFile>,
) {
    // Nothing to end from the menu
    if over_events.read().count() == 0 || !stats.game_active {
        return;
    }

    let new_high_score = stats.set_new_high_score();
    finish_game(&mut settings, &mut stats);
    info!("GAME OVER! Final score: {}", stats.score);

    if new_high_score {
        info!("New high score!");
        high_score_file.save(stats.high_score);
    }

    next_pause.set(Pause(false));
    next_menu.set(Menu::Main);
    cursor.visible = true;
}

/// Start a new game: reset stats, apply the difficulty, fresh fleet.
fn start_game(
    mut commands: Commands,
    mut start_events: MessageReader<StartGame>,
    mut settings: ResMut<Settings>,
    mut stats: ResMut<GameStats>,
    mut delay: ResMut<RespawnDelay>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    entities: Query<Entity, Or<(With<Alien>, With<Bullet>)>>,
    mut ship: Single<&mut Transform, With<Ship>>,
) {
    if start_events.read().count() == 0 || stats.game_active {
        return;
    }

    let difficulty = settings.difficulty;
    apply_difficulty(&mut settings, &mut stats, difficulty);
    stats.begin_game();

    clear_playfield(&mut commands, &entities);
    spawn_fleet(&mut commands, &settings);
    center_ship(&mut ship, &settings);
    delay.clear();

    next_menu.set(Menu::None);
    cursor.visible = false;
    info!(
        "New game on {} starting at level {}",
        difficulty.label(),
        stats.level
    );
}

#[cfg(test)]
mod tests {
    use bevy::ecs::{message::Messages, system::RunSystemOnce};

    use super::*;
    use crate::game::{
        collision::{Hitbox, check_bullet_alien_collisions},
        fleet::fleet_layout,
        ship::ship_home,
    };

    fn new_game() -> (Settings, GameStats) {
        let settings = Settings::default();
        let stats = GameStats::new(settings.ship_limit);
        (settings, stats)
    }

    #[test]
    fn test_easy_starts_at_level_one() {
        let (mut settings, mut stats) = new_game();
        apply_difficulty(&mut settings, &mut stats, Difficulty::Easy);
        assert_eq!(stats.level, 1);
        assert_eq!(settings.alien_points, 50);
        assert_eq!(settings.alien_speed, settings.base_alien_speed);
    }

    #[test]
    fn test_medium_fast_forwards_three_levels() {
        let (mut settings, mut stats) = new_game();
        apply_difficulty(&mut settings, &mut stats, Difficulty::Medium);
        assert_eq!(settings.difficulty, Difficulty::Medium);
        assert_eq!(stats.level, 4);
        // 50 -> 75 -> 112 -> 168
        assert_eq!(settings.alien_points, 168);
        assert!(settings.alien_speed > settings.base_alien_speed);
    }

    #[test]
    fn test_difficulty_change_does_not_stack() {
        let (mut settings, mut stats) = new_game();
        apply_difficulty(&mut settings, &mut stats, Difficulty::Hard);
        assert_eq!(stats.level, 7);

        stats.score = 900;
        apply_difficulty(&mut settings, &mut stats, Difficulty::Medium);
        assert_eq!(stats.level, 4);
        assert_eq!(stats.score, 0);
        assert_eq!(settings.alien_points, 168);
    }

    #[test]
    fn test_advance_level() {
        let (mut settings, mut stats) = new_game();
        advance_level(&mut settings, &mut stats);
        assert_eq!(stats.level, 2);
        assert_eq!(settings.alien_points, 75);
    }

    #[test]
    fn test_finish_game_keeps_score_and_high_score() {
        let (mut settings, mut stats) = new_game();
        stats.game_active = true;
        stats.record_hits(50, 10);
        finish_game(&mut settings, &mut stats);
        assert!(!stats.game_active);
        assert_eq!(stats.score, 500);
        assert_eq!(stats.high_score, 500);
    }

    /// An app with the game's messages and resources, but no schedules.
    fn game_app(stats: GameStats) -> App {
        let mut app = App::new();
        app.add_message::<AliensDestroyed>()
            .add_message::<FleetCleared>()
            .add_message::<ShipHit>()
            .add_message::<GameOver>()
            .init_resource::<RespawnDelay>()
            .init_resource::<NextState<Menu>>()
            .init_resource::<NextState<Pause>>()
            .insert_resource(Settings::default())
            .insert_resource(stats);
        app
    }

    fn playing(ships_left: u32) -> GameStats {
        let mut stats = GameStats::new(3);
        stats.ships_left = ships_left;
        stats.begin_game();
        stats
    }

    fn spawn_alien(app: &mut App, x: f32, y: f32) -> Entity {
        let size = Settings::default().alien_size();
        app.world_mut()
            .spawn((Alien, Hitbox(size), Transform::from_xyz(x, y, 1.0)))
            .id()
    }

    fn spawn_bullet(app: &mut App, x: f32, y: f32) -> Entity {
        let size = Settings::default().bullet_size();
        app.world_mut()
            .spawn((Bullet, Hitbox(size), Transform::from_xyz(x, y, 2.0)))
            .id()
    }

    fn alien_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<Alien>>()
            .iter(app.world())
            .count()
    }

    fn bullet_count(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<Entity, With<Bullet>>()
            .iter(app.world())
            .count()
    }

    fn full_fleet() -> usize {
        let settings = Settings::default();
        fleet_layout(
            settings.screen_size(),
            settings.alien_size(),
            settings.ship_height,
        )
        .len()
    }

    fn high_score_file(name: &str) -> HighScoreFile {
        let dir = std::env::temp_dir().join(format!(
            "alien_invasion_state_test_{}_{}",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_dir_all(&dir);
        HighScoreFile::new(dir.join("high_score.txt"))
    }

    #[test]
    fn test_shooting_last_alien_starts_next_level() {
        let mut app = game_app(playing(3));
        spawn_alien(&mut app, 0.0, 100.0);
        spawn_bullet(&mut app, 0.0, 90.0);

        let world = app.world_mut();
        world.run_system_once(check_bullet_alien_collisions).unwrap();
        world.run_system_once(update_score).unwrap();
        world.run_system_once(start_next_level).unwrap();

        let stats = app.world().resource::<GameStats>();
        assert_eq!(stats.level, 2);
        assert_eq!(stats.score, 50);
        assert_eq!(app.world().resource::<Settings>().alien_points, 75);
        assert_eq!(alien_count(&mut app), full_fleet());
        assert_eq!(bullet_count(&mut app), 0);
    }

    #[test]
    fn test_fleet_with_survivors_is_not_cleared() {
        let mut app = game_app(playing(3));
        spawn_alien(&mut app, 0.0, 100.0);
        let survivor = spawn_alien(&mut app, 300.0, 100.0);
        spawn_bullet(&mut app, 0.0, 90.0);

        let world = app.world_mut();
        world.run_system_once(check_bullet_alien_collisions).unwrap();
        assert!(world.resource::<Messages<FleetCleared>>().is_empty());
        world.run_system_once(start_next_level).unwrap();

        assert_eq!(app.world().resource::<GameStats>().level, 1);
        assert_eq!(alien_count(&mut app), 1);
        assert!(app.world().get_entity(survivor).is_ok());
        assert_eq!(bullet_count(&mut app), 0);
    }

    #[test]
    fn test_ship_hit_resets_playfield_and_costs_one_life() {
        let mut app = game_app(playing(3));
        let old_alien = spawn_alien(&mut app, 100.0, -350.0);
        let old_bullet = spawn_bullet(&mut app, 0.0, 0.0);
        let ship = app
            .world_mut()
            .spawn((Ship, Transform::from_xyz(250.0, -370.0, 1.0)))
            .id();

        // Rammed and reached the bottom in the same frame
        app.world_mut().write_message(ShipHit);
        app.world_mut().write_message(ShipHit);
        app.world_mut().run_system_once(handle_ship_hit).unwrap();

        let stats = app.world().resource::<GameStats>();
        assert_eq!(stats.ships_left, 2);
        assert!(stats.game_active);
        assert!(app.world().resource::<Messages<GameOver>>().is_empty());

        assert!(app.world().get_entity(old_alien).is_err());
        assert!(app.world().get_entity(old_bullet).is_err());
        assert_eq!(alien_count(&mut app), full_fleet());
        assert_eq!(bullet_count(&mut app), 0);

        let ship_position = app.world().get::<Transform>(ship).unwrap().translation;
        assert_eq!(ship_position.truncate(), ship_home(&Settings::default()));
        assert!(app.world().resource::<RespawnDelay>().0.is_some());
    }

    #[test]
    fn test_losing_last_ship_ends_game() {
        let mut app = game_app(playing(1));
        app.world_mut().spawn((Ship, Transform::default()));
        let cursor = app
            .world_mut()
            .spawn((PrimaryWindow, CursorOptions {
                visible: false,
                ..default()
            }))
            .id();
        let file = high_score_file("last_ship");
        app.insert_resource(file.clone());
        app.world_mut().resource_mut::<Settings>().increase_speed();
        app.world_mut().resource_mut::<GameStats>().record_hits(50, 4);

        app.world_mut().write_message(ShipHit);
        let world = app.world_mut();
        world.run_system_once(handle_ship_hit).unwrap();
        assert_eq!(world.resource::<GameStats>().ships_left, 0);
        world.run_system_once(end_game).unwrap();

        let stats = app.world().resource::<GameStats>();
        assert!(!stats.game_active);
        assert_eq!(stats.score, 200);
        // Speeds are back to their starting values
        let settings = app.world().resource::<Settings>();
        assert_eq!(settings.alien_points, settings.base_alien_points);
        assert!(app.world().get::<CursorOptions>(cursor).unwrap().visible);
        assert_eq!(file.read().unwrap(), 200);
    }

    #[test]
    fn test_game_over_from_menu_changes_nothing() {
        let (mut settings, mut stats) = new_game();
        apply_difficulty(&mut settings, &mut stats, Difficulty::Hard);
        let hard_points = settings.alien_points;

        let mut app = game_app(stats);
        app.insert_resource(settings);
        let cursor = app
            .world_mut()
            .spawn((PrimaryWindow, CursorOptions {
                visible: false,
                ..default()
            }))
            .id();
        let file = high_score_file("menu");
        app.insert_resource(file.clone());

        app.world_mut().write_message(GameOver);
        app.world_mut().run_system_once(end_game).unwrap();

        assert_eq!(app.world().resource::<Settings>().alien_points, hard_points);
        assert_eq!(app.world().resource::<GameStats>().level, 7);
        assert!(!app.world().get::<CursorOptions>(cursor).unwrap().visible);
        assert_eq!(file.read().unwrap(), 0);
    }

    #[test]
    fn test_tied_high_score_is_not_saved() {
        let mut stats = playing(3);
        stats.high_score = 500;
        stats.begin_game();
        stats.record_hits(50, 10);

        let mut app = game_app(stats);
        app.world_mut().spawn((PrimaryWindow, CursorOptions::default()));
        let file = high_score_file("tie");
        app.insert_resource(file.clone());

        app.world_mut().write_message(GameOver);
        app.world_mut().run_system_once(end_game).unwrap();

        assert!(!app.world().resource::<GameStats>().game_active);
        assert_eq!(file.read().unwrap(), 0);
    }
}
