//! Game statistics - score, lives, level and the high score.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<GameStats>();
}

/// Resource tracking the statistics of the current game.
#[derive(Resource, Debug, Clone, PartialEq, Eq, Reflect)]
#[reflect(Resource)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    /// High score when the current game began.
    pub starting_high_score: u32,
    /// The game starts inactive, showing the main menu.
    pub game_active: bool,
}

impl GameStats {
    pub fn new(ship_limit: u32) -> Self {
        Self {
            ships_left: ship_limit,
            score: 0,
            level: 1,
            high_score: 0,
            starting_high_score: 0,
            game_active: false,
        }
    }

    /// Mark a game as running, remembering the high score to beat.
    pub fn begin_game(&mut self) {
        self.starting_high_score = self.high_score;
        self.game_active = true;
    }

    /// Did this game beat the high score it started with?
    pub fn set_new_high_score(&self) -> bool {
        self.high_score > self.starting_high_score
    }

    /// Reset the statistics that change during a game.
    pub fn reset_stats(&mut self, ship_limit: u32, reset_level: bool) {
        self.ships_left = ship_limit;
        self.score = 0;
        if reset_level {
            self.level = 1;
        }
    }

    /// Award points for destroyed aliens.
    ///
    /// Returns the points awarded. The high score follows the score up.
    pub fn record_hits(&mut self, points_per_alien: u32, aliens: u32) -> u32 {
        let points = points_per_alien.saturating_mul(aliens);
        self.score = self.score.saturating_add(points);
        self.check_high_score();
        points
    }

    /// Raise the high score if the current score beats it.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }

    /// Take away one ship. Returns `true` while the player has ships left.
    pub fn lose_ship(&mut self) -> bool {
        self.ships_left = self.ships_left.saturating_sub(1);
        self.ships_left > 0
    }
}

/// Run condition: the player is in a game.
pub fn game_active(stats: Res<GameStats>) -> bool {
    stats.game_active
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_inactive_at_level_one() {
        let stats = GameStats::new(3);
        assert_eq!(stats.ships_left, 3);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.score, 0);
        assert!(!stats.game_active);
    }

    #[test]
    fn test_record_hits_adds_points_times_aliens() {
        let mut stats = GameStats::new(3);
        assert_eq!(stats.record_hits(50, 1), 50);
        assert_eq!(stats.record_hits(75, 3), 225);
        assert_eq!(stats.score, 275);
        assert_eq!(stats.high_score, 275);
    }

    #[test]
    fn test_score_never_decreases() {
        let mut stats = GameStats::new(3);
        let mut last = 0;
        for aliens in [0, 2, 0, 5, 1] {
            stats.record_hits(50, aliens);
            assert!(stats.score >= last);
            last = stats.score;
        }
        assert_eq!(stats.score, 400);
    }

    #[test]
    fn test_high_score_is_kept_when_beaten_score_resets() {
        let mut stats = GameStats::new(3);
        stats.high_score = 1000;
        stats.record_hits(50, 4);
        assert_eq!(stats.high_score, 1000);
        assert!(!stats.check_high_score());

        stats.record_hits(50, 30);
        assert_eq!(stats.high_score, 1700);

        stats.reset_stats(3, true);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.high_score, 1700);
    }

    #[test]
    fn test_tying_the_high_score_is_not_a_new_one() {
        let mut stats = GameStats::new(3);
        stats.high_score = 500;
        stats.begin_game();
        stats.record_hits(50, 10);
        assert_eq!(stats.score, stats.high_score);
        assert!(!stats.set_new_high_score());

        stats.record_hits(50, 1);
        assert!(stats.set_new_high_score());
    }

    #[test]
    fn test_lose_ship_stops_at_zero() {
        let mut stats = GameStats::new(2);
        assert!(stats.lose_ship());
        assert!(!stats.lose_ship());
        assert_eq!(stats.ships_left, 0);
        assert!(!stats.lose_ship());
        assert_eq!(stats.ships_left, 0);
    }

    #[test]
    fn test_reset_stats_can_keep_level() {
        let mut stats = GameStats::new(3);
        stats.level = 4;
        stats.ships_left = 1;
        stats.reset_stats(3, false);
        assert_eq!(stats.level, 4);
        assert_eq!(stats.ships_left, 3);

        stats.reset_stats(3, true);
        assert_eq!(stats.level, 1);
    }
}
