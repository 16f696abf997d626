/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed into the `front` buffer, diffed against `back`
/// (the previous frame), and only changed cells are written out. Commands
/// are batched with `queue!` and flushed once. This keeps redraws
/// flicker-free even when the whole level scrolls.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
            SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Pos;
use crate::sim::level::{Legend, Role};
use crate::sim::universe::Universe;
use crate::ui::layout::{Layout, TerminalTooSmall};
use crate::ui::text::{StatusLines, GAME_NAME, QUIT_KEY};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    /// Reverse video; how the player pawn stands out from the floor.
    reverse: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::Reset,
        reverse: false,
    };

    /// Sentinel used to invalidate the back buffer: differs from any real
    /// cell, so every position gets diff'd on the next flush.
    const INVALID: Cell = Cell {
        ch: '\0',
        fg: Color::Magenta,
        reverse: true,
    };

    fn new(ch: char, fg: Color) -> Self {
        Cell {
            ch,
            fg,
            reverse: false,
        }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell::new(ch, fg));
            cx += 1;
        }
    }

    /// Horizontally centered text, the way all status lines are drawn.
    fn put_str_centered(&mut self, y: usize, s: &str, fg: Color) {
        let x = self.width.saturating_sub(s.chars().count()) / 2;
        self.put_str(x, y, s, fg);
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All)
        )?;
        self.sync_size()?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Track the terminal size, forcing a full repaint when it changes.
    fn sync_size(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, Clear(ClearType::All))?;
        }
        Ok(())
    }

    /// Draw one playing frame: status text above and below, the level
    /// window between them. A too-small terminal gets a resize notice
    /// instead; play resumes as soon as the window grows.
    pub fn draw_game(
        &mut self,
        univ: &Universe,
        legend: Legend,
        best_at_start: Option<u32>,
    ) -> io::Result<()> {
        self.sync_size()?;
        self.front.clear();

        let mut lines = StatusLines::new(univ, legend, best_at_start);

        match Layout::compute(
            self.term_h,
            self.term_w,
            lines.reserved(),
            univ.height(),
            univ.width(),
            univ.player.pos.y,
            univ.player.pos.x,
        ) {
            Ok(layout) => {
                lines.set_scroll(layout.scroll);
                self.compose_status(&lines);
                self.compose_level(univ, legend, &layout);
            }
            Err(too_small) => self.compose_too_small(&too_small),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    pub fn draw_level_select(
        &mut self,
        file: &str,
        names: &[&str],
        cursor: usize,
    ) -> io::Result<()> {
        self.sync_size()?;
        self.front.clear();
        self.compose_level_select(file, names, cursor);
        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::Reset;
        let mut last_reverse = false;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::Reset),
            SetAttribute(Attribute::NoReverse),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.reverse != last_reverse {
                    let attr = if cell.reverse {
                        Attribute::Reverse
                    } else {
                        Attribute::NoReverse
                    };
                    queue!(self.writer, SetAttribute(attr))?;
                    last_reverse = cell.reverse;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        queue!(self.writer, SetAttribute(Attribute::NoReverse))?;
        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_status(&mut self, lines: &StatusLines) {
        for (i, line) in lines.top.iter().enumerate() {
            let fg = if i == 0 { Color::Yellow } else { Color::Reset };
            self.front.put_str_centered(i, line, fg);
        }
        let base = self.term_h - lines.bottom.len();
        for (i, line) in lines.bottom.iter().enumerate() {
            self.front.put_str_centered(base + i, line, Color::Reset);
        }
    }

    fn compose_level(&mut self, univ: &Universe, legend: Legend, layout: &Layout) {
        for vy in 0..layout.rows {
            let ly = layout.level_min_y + vy;
            let row = layout.screen_min_y + vy;
            for vx in 0..layout.cols {
                let lx = layout.level_min_x + vx;
                let col = layout.screen_min_x + vx;
                self.compose_square(univ, legend, ly, lx, col, row);
            }
        }
    }

    /// Write the visual for level square (ly, lx) into the front buffer.
    /// Player on top, then boulders, then terrain.
    fn compose_square(
        &mut self,
        univ: &Universe,
        legend: Legend,
        ly: usize,
        lx: usize,
        col: usize,
        row: usize,
    ) {
        let p = univ.player.pos;
        if p.y == ly && p.x == lx {
            let mut cell = Cell::new(legend.symbol(Role::Player), Color::Reset);
            cell.reverse = true;
            self.front.set(col, row, cell);
            return;
        }
        if univ.boulders.iter().any(|b| b.pos.y == ly && b.pos.x == lx) {
            self.front
                .set(col, row, Cell::new(legend.symbol(Role::Boulder), Color::Reset));
            return;
        }
        let square = univ.square_at(Pos::new(ly, lx));
        let (role, fg) = if square.is_wall() {
            (Role::Wall, Color::Reset)
        } else if square.is_pit() {
            (Role::Pit, Color::Cyan)
        } else {
            // Filled pits read as ordinary floor.
            (Role::Floor, Color::DarkGrey)
        };
        self.front.set(col, row, Cell::new(legend.symbol(role), fg));
    }

    fn compose_too_small(&mut self, err: &TerminalTooSmall) {
        let msg = err.to_string();
        let row = self.term_h / 2;
        self.front.put_str_centered(row.saturating_sub(1), &msg, Color::Red);
        self.front.put_str_centered(
            row + 1,
            &format!("(or press '{QUIT_KEY}' to quit)"),
            Color::Reset,
        );
    }

    fn compose_level_select(&mut self, file: &str, names: &[&str], cursor: usize) {
        self.front.put_str_centered(1, GAME_NAME, Color::Yellow);
        self.front
            .put_str_centered(3, &format!("Choose a level from {file}"), Color::Reset);

        let list_top = 5;
        let visible = self.term_h.saturating_sub(list_top + 3).max(1);
        // Keep the cursor inside the visible window.
        let scroll = cursor.saturating_sub(visible.saturating_sub(1));

        if scroll > 0 {
            self.front.put_str(2, list_top - 1, "...", Color::DarkGrey);
        }
        for i in 0..visible {
            let idx = scroll + i;
            if idx >= names.len() {
                break;
            }
            let row = list_top + i;
            let entry = format!("{:>3}. {}", idx + 1, names[idx]);
            if idx == cursor {
                let mut cx = 2;
                for ch in format!("> {entry}").chars() {
                    let mut cell = Cell::new(ch, Color::Green);
                    cell.reverse = true;
                    self.front.set(cx, row, cell);
                    cx += 1;
                }
            } else {
                self.front.put_str(4, row, &entry, Color::Reset);
            }
        }
        if scroll + visible < names.len() {
            self.front.put_str(2, list_top + visible, "...", Color::DarkGrey);
        }

        let footer = format!("Up/Down: select   Enter: play   '{QUIT_KEY}': quit");
        let footer_row = self.term_h.saturating_sub(2);
        self.front.put_str_centered(footer_row, &footer, Color::DarkGrey);
    }
}
