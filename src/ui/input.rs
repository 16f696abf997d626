/// Keyboard input.
///
/// The game is turn-based: nothing happens until the player acts, so we
/// block on the next terminal event instead of polling. Key releases and
/// repeats both count as input; a held arrow key walks the player.

use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::domain::entity::{Direction, GameAction};
use crate::ui::text::{PLAY_AGAIN_KEY, QUIT_KEY};

/// Block until the next event and translate it to a game action.
///
/// Resize events come back as `Other` so the caller redraws against the
/// new terminal size. Unbound keys are `Other` too; the turn loop treats
/// them as a no-op frame.
pub fn read_action() -> io::Result<GameAction> {
    loop {
        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                {
                    return Ok(GameAction::Quit);
                }
                return Ok(map_key(key.code));
            }
            Event::Resize(..) => return Ok(GameAction::Other),
            _ => {}
        }
    }
}

/// What a key means on the level-select screen.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuAction {
    Up,
    Down,
    Confirm,
    Quit,
    Other,
}

/// Block until the next event, translated for the level-select screen.
pub fn read_menu_action() -> io::Result<MenuAction> {
    loop {
        match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                {
                    return Ok(MenuAction::Quit);
                }
                return Ok(match key.code {
                    KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => MenuAction::Up,
                    KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => MenuAction::Down,
                    KeyCode::Enter => MenuAction::Confirm,
                    KeyCode::Char(c) if c.eq_ignore_ascii_case(&QUIT_KEY) => MenuAction::Quit,
                    _ => MenuAction::Other,
                });
            }
            Event::Resize(..) => return Ok(MenuAction::Other),
            _ => {}
        }
    }
}

fn map_key(code: KeyCode) -> GameAction {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            GameAction::Move(Direction::Up)
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            GameAction::Move(Direction::Down)
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            GameAction::Move(Direction::Left)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            GameAction::Move(Direction::Right)
        }
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&QUIT_KEY) => GameAction::Quit,
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&PLAY_AGAIN_KEY) => GameAction::PlayAgain,
        _ => GameAction::Other,
    }
}
