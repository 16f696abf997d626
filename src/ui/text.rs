/// Status text: the reserved lines above and below the playing field,
/// rebuilt from game state every frame. A typed record instead of ad-hoc
/// strings so the layout can measure exactly what will be drawn.

use crate::sim::level::{Legend, Role};
use crate::sim::universe::Universe;
use crate::ui::layout::{Reserved, ScrollInfo};

pub const GAME_NAME: &str = "Roguelike Sokoban";
pub const QUIT_KEY: char = 'q';
pub const PLAY_AGAIN_KEY: char = 'r';

/// Widest the scroll line can get; used as a placeholder when measuring
/// the layout, before the real scroll flags exist for this frame.
const SCROLL_PLACEHOLDER: &str = "Scroll: UP, DOWN, LEFT, RIGHT";

pub struct StatusLines {
    pub top: Vec<String>,
    pub bottom: Vec<String>,
    /// Index in `bottom` of the scroll line, while placeholder-sized.
    scroll_slot: Option<usize>,
}

impl StatusLines {
    /// Build the frame's text from game state. `best_at_start` is the
    /// stored best score when this play-through began.
    pub fn new(univ: &Universe, legend: Legend, best_at_start: Option<u32>) -> Self {
        if univ.game_won {
            StatusLines::won(univ, best_at_start)
        } else {
            StatusLines::playing(univ, legend, best_at_start)
        }
    }

    fn playing(univ: &Universe, legend: Legend, best: Option<u32>) -> Self {
        let top = vec![
            GAME_NAME.to_string(),
            format!(
                "Use the arrow keys to move around, '{QUIT_KEY}' to quit, \
                 and '{PLAY_AGAIN_KEY}' to restart this level."
            ),
            format!(
                "Move yourself ({}) over floor ({}) into boulders ({}) to push them into pits ({}).",
                legend.symbol(Role::Player),
                legend.symbol(Role::Floor),
                legend.symbol(Role::Boulder),
                legend.symbol(Role::Pit),
            ),
            "Fill every pit to solve the puzzle.".to_string(),
            format!("Level: {}", univ.level_name),
        ];
        let bottom = vec![
            SCROLL_PLACEHOLDER.to_string(),
            format!(
                "Pits remaining: {}      Boulders remaining: {}      Moves used: {}",
                univ.pits_remaining,
                univ.boulders.len(),
                univ.moves_taken,
            ),
            match best {
                Some(best) => format!("Current best score: {best}"),
                None => "No current best score".to_string(),
            },
        ];
        StatusLines {
            top,
            bottom,
            scroll_slot: Some(0),
        }
    }

    fn won(univ: &Universe, best: Option<u32>) -> Self {
        let plural = if univ.moves_taken == 1 { "" } else { "s" };
        let compared = match best {
            None => format!("You set the first best score of {} moves!", univ.moves_taken),
            Some(best) if univ.moves_taken < best => {
                format!("You beat the current best score of {best} moves!")
            }
            Some(_) => String::new(),
        };
        let top = vec![
            GAME_NAME.to_string(),
            format!(
                "You solved the puzzle in {} move{plural}! Congratulations!",
                univ.moves_taken,
            ),
            compared,
            String::new(),
            format!("Level: {}", univ.level_name),
        ];
        let bottom = vec![
            String::new(),
            format!("-- Press '{PLAY_AGAIN_KEY}' to play again --"),
            format!("-- Press '{QUIT_KEY}' to quit --"),
        ];
        StatusLines {
            top,
            bottom,
            scroll_slot: None,
        }
    }

    /// Measure for the layout. The scroll line is measured at its
    /// maximum size so the layout never shifts as scroll flags change.
    pub fn reserved(&self) -> Reserved {
        let widest = self
            .top
            .iter()
            .chain(&self.bottom)
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        Reserved {
            top_lines: self.top.len(),
            bottom_lines: self.bottom.len(),
            widest_line: widest,
        }
    }

    /// Fill in the real scroll line once the layout for this frame is known.
    pub fn set_scroll(&mut self, scroll: ScrollInfo) {
        let Some(slot) = self.scroll_slot else {
            return;
        };
        if !scroll.any() {
            self.bottom[slot] = String::new();
            return;
        }
        let mut dirs = Vec::new();
        if scroll.up {
            dirs.push("UP");
        }
        if scroll.down {
            dirs.push("DOWN");
        }
        if scroll.left {
            dirs.push("LEFT");
        }
        if scroll.right {
            dirs.push("RIGHT");
        }
        self.bottom[slot] = format!("Scroll: {}", dirs.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Limits;
    use crate::sim::level::LevelFile;
    use crate::sim::universe::Universe;

    fn sample() -> (Universe, Legend) {
        let text = "Player = @\nBoulder = o\nPit = ^\nFloor = .\nWall = +\nLevel One\n @o^\n";
        let file = LevelFile::parse(text, "test.txt", &Limits::default()).unwrap();
        let level = file.by_index(0).unwrap();
        (Universe::new(&level), level.legend)
    }

    #[test]
    fn playing_lines_show_counters_and_symbols() {
        let (univ, legend) = sample();
        let lines = StatusLines::new(&univ, legend, Some(9));
        assert_eq!(lines.top[0], GAME_NAME);
        assert!(lines.top[2].contains("(@)"));
        assert!(lines.top[4].ends_with("Level One"));
        assert!(lines.bottom[1].contains("Pits remaining: 1"));
        assert!(lines.bottom[1].contains("Moves used: 0"));
        assert_eq!(lines.bottom[2], "Current best score: 9");
    }

    #[test]
    fn reserved_measures_widest_line() {
        let (univ, legend) = sample();
        let lines = StatusLines::new(&univ, legend, None);
        let reserved = lines.reserved();
        assert_eq!(reserved.top_lines, 5);
        assert_eq!(reserved.bottom_lines, 3);
        let widest = lines
            .top
            .iter()
            .chain(&lines.bottom)
            .map(|l| l.len())
            .max()
            .unwrap();
        assert_eq!(reserved.widest_line, widest);
    }

    #[test]
    fn scroll_line_lists_active_directions() {
        let (univ, legend) = sample();
        let mut lines = StatusLines::new(&univ, legend, None);
        lines.set_scroll(ScrollInfo {
            up: true,
            down: false,
            left: false,
            right: true,
        });
        assert_eq!(lines.bottom[0], "Scroll: UP, RIGHT");
        lines.set_scroll(ScrollInfo::default());
        assert_eq!(lines.bottom[0], "");
    }

    #[test]
    fn win_text_reports_score_comparison() {
        let (mut univ, legend) = sample();
        univ.eval_action(crate::domain::entity::Direction::Right);
        assert!(univ.game_won);

        let first = StatusLines::new(&univ, legend, None);
        assert!(first.top[2].contains("first best score of 1"));
        let beat = StatusLines::new(&univ, legend, Some(5));
        assert!(beat.top[2].contains("beat the current best score of 5"));
        let tied = StatusLines::new(&univ, legend, Some(1));
        assert_eq!(tied.top[2], "");
        assert!(beat.top[1].contains("in 1 move!"));
    }
}
