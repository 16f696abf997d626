/// Viewport layout: maps the level grid onto the terminal.
///
/// Pure per-frame computation — no terminal calls in here. Given the
/// screen size, the reserved text lines, the level size, and the player
/// position, it produces the visible window of the level, where that
/// window lands on screen, and which directions hold more level content.
///
/// Per axis (rows shown, columns symmetric):
///   - available span = screen extent minus reserved lines and fixed
///     margins, rounded down to even so centering never jitters by one
///   - level fits → window is the whole level, centered in the span
///   - level larger → window slides to keep the player centered, clamped
///     at both level edges
///
/// Fails with `TerminalTooSmall` when the screen cannot hold the reserved
/// lines plus a minimum playing field, or the widest reserved line.

use thiserror::Error;

/// Minimum rows of playing field required on top of the reserved lines.
pub const MIN_FIELD_ROWS: usize = 7;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("terminal too small; enlarge the window")]
pub struct TerminalTooSmall;

/// Reserved screen real estate, derived from the status text each frame.
#[derive(Clone, Copy, Debug)]
pub struct Reserved {
    pub top_lines: usize,
    pub bottom_lines: usize,
    /// Width of the widest reserved line, top or bottom.
    pub widest_line: usize,
}

/// Which directions have level content beyond the visible window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollInfo {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl ScrollInfo {
    pub fn any(self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// One frame's window placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Top-left of the visible window, in level coordinates.
    pub level_min_y: usize,
    pub level_min_x: usize,
    /// Where the window's top-left cell lands, in screen coordinates.
    pub screen_min_y: usize,
    pub screen_min_x: usize,
    /// Visible window extent in squares.
    pub rows: usize,
    pub cols: usize,
    pub scroll: ScrollInfo,
}

impl Layout {
    /// Compute the frame layout, or fail if the terminal cannot fit the
    /// reserved lines plus `MIN_FIELD_ROWS` and the widest line.
    pub fn compute(
        screen_h: usize,
        screen_w: usize,
        reserved: Reserved,
        level_h: usize,
        level_w: usize,
        player_y: usize,
        player_x: usize,
    ) -> Result<Layout, TerminalTooSmall> {
        let min_height = reserved.top_lines + reserved.bottom_lines + MIN_FIELD_ROWS;
        if screen_h < min_height || screen_w < reserved.widest_line {
            return Err(TerminalTooSmall);
        }

        // One gap row under the top block, one above the bottom block
        // (plus the final screen row), one column of margin each side.
        let avail_min_y = reserved.top_lines + 1;
        let avail_max_y = screen_h - reserved.bottom_lines - 2;
        let avail_min_x = 1;
        let avail_max_x = screen_w - 2;

        let (level_min_y, screen_min_y, rows, more_up, more_down) =
            axis(avail_min_y, avail_max_y, 0, level_h, player_y);
        let (level_min_x, screen_min_x, cols, more_left, more_right) =
            axis(avail_min_x, avail_max_x, 1, level_w, player_x);

        Ok(Layout {
            level_min_y,
            level_min_x,
            screen_min_y,
            screen_min_x,
            rows,
            cols,
            scroll: ScrollInfo {
                up: more_up,
                down: more_down,
                left: more_left,
                right: more_right,
            },
        })
    }
}

/// One axis of the window placement.
/// Returns (window origin in level space, window origin in screen space,
/// visible extent, more-before flag, more-after flag).
fn axis(
    avail_min: usize,
    avail_max: usize,
    mid_nudge: usize,
    level_extent: usize,
    player_pos: usize,
) -> (usize, usize, usize, bool, bool) {
    // Round the span down to even to prevent off-by-one centering jitter.
    let mut avail = avail_max.saturating_sub(avail_min);
    if avail % 2 != 0 {
        avail -= 1;
    }
    // The x axis centers one cell better with a +1 nudge.
    let avail_mid = (avail_max + avail_min) / 2 + mid_nudge;

    if avail >= level_extent {
        // Whole level fits: center it within the available span.
        let screen_min = avail_mid - level_extent / 2;
        (0, screen_min, level_extent, false, false)
    } else {
        // Sliding window: player as centered as possible, clamped to the
        // level edges. The far-edge clamp runs first, so the near-edge
        // subtraction can never underflow past a valid origin.
        let origin = if level_extent - player_pos < avail / 2 {
            level_extent - avail
        } else {
            player_pos.saturating_sub(avail / 2)
        };
        let more_before = origin > 0;
        let more_after = origin < level_extent - avail;
        (origin, avail_min, avail, more_before, more_after)
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn reserved() -> Reserved {
        Reserved {
            top_lines: 5,
            bottom_lines: 4,
            widest_line: 40,
        }
    }

    fn compute(
        screen: (usize, usize),
        level: (usize, usize),
        player: (usize, usize),
    ) -> Result<Layout, TerminalTooSmall> {
        Layout::compute(
            screen.0, screen.1, reserved(), level.0, level.1, player.0, player.1,
        )
    }

    // ── Too-small threshold ──

    #[test]
    fn too_small_boundaries() {
        // Height threshold: top + bottom + 7 = 16.
        assert!(compute((15, 80), (5, 5), (2, 2)).is_err());
        assert!(compute((16, 80), (5, 5), (2, 2)).is_ok());
        assert!(compute((17, 80), (5, 5), (2, 2)).is_ok());
        // Width threshold: widest reserved line = 40.
        assert!(compute((24, 39), (5, 5), (2, 2)).is_err());
        assert!(compute((24, 40), (5, 5), (2, 2)).is_ok());
        assert!(compute((24, 41), (5, 5), (2, 2)).is_ok());
    }

    // ── Level fits on screen ──

    #[test]
    fn small_level_is_centered() {
        let l = compute((30, 80), (8, 10), (4, 5)).unwrap();
        assert_eq!((l.level_min_y, l.level_min_x), (0, 0));
        assert_eq!((l.rows, l.cols), (8, 10));
        assert_eq!(l.scroll, ScrollInfo::default());
        // Available rows: 6..24, mid 15 → window starts at 15 - 4.
        assert_eq!(l.screen_min_y, 11);
        // Available cols: 1..78, mid 39+1 → window starts at 40 - 5.
        assert_eq!(l.screen_min_x, 35);
    }

    #[test]
    fn fits_result_ignores_player_position() {
        let a = compute((30, 80), (8, 10), (0, 0)).unwrap();
        let b = compute((30, 80), (8, 10), (7, 9)).unwrap();
        assert_eq!(a, b);
    }

    // ── Level larger than the viewport ──

    #[test]
    fn large_level_window_contains_player() {
        for py in 0..60 {
            for px in 0..120 {
                let l = compute((30, 80), (60, 120), (py, px)).unwrap();
                assert!(l.level_min_y <= py && py < l.level_min_y + l.rows);
                assert!(l.level_min_x <= px && px < l.level_min_x + l.cols);
                assert!(l.level_min_y + l.rows <= 60);
                assert!(l.level_min_x + l.cols <= 120);
            }
        }
    }

    #[test]
    fn window_clamps_at_near_edge() {
        let l = compute((30, 80), (60, 120), (0, 0)).unwrap();
        assert_eq!((l.level_min_y, l.level_min_x), (0, 0));
        assert!(!l.scroll.up);
        assert!(!l.scroll.left);
        assert!(l.scroll.down);
        assert!(l.scroll.right);
    }

    #[test]
    fn window_clamps_at_far_edge() {
        let l = compute((30, 80), (60, 120), (59, 119)).unwrap();
        assert_eq!(l.level_min_y, 60 - l.rows);
        assert_eq!(l.level_min_x, 120 - l.cols);
        assert!(l.scroll.up);
        assert!(l.scroll.left);
        assert!(!l.scroll.down);
        assert!(!l.scroll.right);
    }

    #[test]
    fn window_centers_player_mid_level() {
        let l = compute((30, 80), (60, 120), (30, 60)).unwrap();
        assert_eq!(l.level_min_y, 30 - l.rows / 2);
        assert_eq!(l.level_min_x, 60 - l.cols / 2);
        assert!(l.scroll.up && l.scroll.down && l.scroll.left && l.scroll.right);
    }

    #[test]
    fn available_span_rounds_down_to_even() {
        // Rows available: screen_h - top - bottom - 3; force it odd.
        let l = compute((30, 80), (60, 120), (30, 60)).unwrap();
        assert_eq!(l.rows % 2, 0);
        assert_eq!(l.cols % 2, 0);
    }

    #[test]
    fn mixed_axes() {
        // Tall narrow level: fits horizontally, scrolls vertically.
        let l = compute((30, 80), (60, 10), (30, 5)).unwrap();
        assert_eq!(l.level_min_x, 0);
        assert_eq!(l.cols, 10);
        assert!(l.level_min_y > 0);
        assert!(l.scroll.up && l.scroll.down);
        assert!(!l.scroll.left && !l.scroll.right);
    }
}
