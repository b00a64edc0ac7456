//! High score persistence.
//!
//! The best score is kept as a single integer in a text file in the
//! user's data directory. It is read on startup and written on exit.

use bevy::prelude::*;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use super::stats::GameStats;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<HighScoreFile>();

    // Load the high score on startup
    app.add_systems(Startup, load_high_score);

    // Save it whenever the app is about to exit
    app.add_systems(Last, save_high_score_on_exit.run_if(on_message::<AppExit>));
}

/// File name used for the high score.
const HIGH_SCORE_FILE: &str = "high_score.txt";

/// Resource pointing at the high score file.
#[derive(Resource, Debug, Clone)]
pub struct HighScoreFile {
    pub path: PathBuf,
}

impl Default for HighScoreFile {
    fn default() -> Self {
        let path = dirs::data_local_dir()
            .map(|dir| dir.join("alien_invasion").join(HIGH_SCORE_FILE))
            .unwrap_or_else(|| PathBuf::from(HIGH_SCORE_FILE));
        Self { path }
    }
}

impl HighScoreFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the stored high score.
    ///
    /// A missing file means nobody has played yet and reads as 0.
    pub fn read(&self) -> io::Result<u32> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => contents
                .trim()
                .parse()
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the stored high score.
    pub fn write(&self, high_score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, high_score.to_string())
    }

    /// Read the high score, logging and falling back to 0 on failure.
    pub fn load(&self) -> u32 {
        match self.read() {
            Ok(high_score) => {
                info!("Loaded high score {} from {:?}", high_score, self.path);
                high_score
            }
            Err(e) => {
                warn!("Failed to read high score from {:?}: {}", self.path, e);
                0
            }
        }
    }

    /// Write the high score, logging any failure.
    pub fn save(&self, high_score: u32) {
        match self.write(high_score) {
            Ok(()) => info!("Saved high score {} to {:?}", high_score, self.path),
            Err(e) => warn!("Failed to write high score to {:?}: {}", self.path, e),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Load the high score on startup.
fn load_high_score(file: Res<HighScoreFile>, mut stats: ResMut<GameStats>) {
    stats.high_score = file.load();
}

fn save_high_score_on_exit(file: Res<HighScoreFile>, stats: Res<GameStats>) {
    file.save(stats.high_score);
}
