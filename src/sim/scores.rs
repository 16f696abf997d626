/// Best-score store: lowest move count per (level file, level name).
///
/// Persisted as TOML, one table per level file keyed by level name:
///   ```toml
///   [scores."levels/default_levels.txt"]
///   "First Level" = 12
///   ```
/// A missing or unreadable score file is treated as an empty board; a
/// failed save is logged and otherwise ignored so it never interrupts
/// play.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScoreBoard {
    #[serde(skip)]
    path: PathBuf,
    #[serde(default)]
    scores: BTreeMap<String, BTreeMap<String, u32>>,
}

impl ScoreBoard {
    /// Load the board from `path`, falling back to empty.
    pub fn load(path: &Path) -> Self {
        let mut board = match std::fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<ScoreBoard>(&text) {
                Ok(board) => board,
                Err(e) => {
                    log::warn!("ignoring unparsable score file {}: {e}", path.display());
                    ScoreBoard::default()
                }
            },
            Err(_) => ScoreBoard::default(),
        };
        board.path = path.to_path_buf();
        board
    }

    /// Best (lowest) recorded move count, if any.
    pub fn best(&self, file: &str, level: &str) -> Option<u32> {
        self.scores.get(file).and_then(|m| m.get(level)).copied()
    }

    /// Record `moves` if it beats (or first sets) the stored best,
    /// persisting immediately. Returns true when a new best was set.
    pub fn record(&mut self, file: &str, level: &str, moves: u32) -> bool {
        let improved = self.best(file, level).map_or(true, |best| moves < best);
        if improved {
            self.scores
                .entry(file.to_string())
                .or_default()
                .insert(level.to_string(), moves);
            self.save();
        }
        improved
    }

    fn save(&self) {
        let text = match toml::to_string_pretty(self) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("could not serialize scores: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, text) {
            log::warn!("could not save scores to {}: {e}", self.path.display());
        }
    }
}
