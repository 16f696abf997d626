/// Entry point and turn loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::path::PathBuf;

use clap::Parser;

use config::GameConfig;
use domain::entity::GameAction;
use sim::level::{LevelFile, ResolvedLevel};
use sim::scores::ScoreBoard;
use sim::universe::{MoveOutcome, Universe};
use ui::input::{self, MenuAction};
use ui::renderer::Renderer;

/// Level set compiled into the binary, used when no file is given.
const DEFAULT_LEVELS: &str = include_str!("../levels/default_levels.txt");
const DEFAULT_LEVELS_NAME: &str = "default levels";

#[derive(Parser)]
#[command(name = "rlsokoban", version, about = "Roguelike Sokoban — push boulders into pits")]
struct Args {
    /// Load levels from FILE instead of the built-in set
    #[arg(short = 'L', long = "level-file", value_name = "FILE")]
    level_file: Option<PathBuf>,

    /// Skip the menu and start the named level (prefix match allowed)
    #[arg(long, value_name = "NAME")]
    level: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let config = GameConfig::load();

    let file = match load_levels(&args, &config) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    let mut scores = ScoreBoard::load(&config.scores_file);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        std::process::exit(1);
    }

    let result = run(&mut renderer, &file, &mut scores, args.level.as_deref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
    println!("Thanks for playing Roguelike Sokoban!");
}

/// Pick the level source: command line first, then the config file,
/// then the built-in set.
fn load_levels(args: &Args, config: &GameConfig) -> Result<LevelFile, sim::level::LevelError> {
    if let Some(path) = args.level_file.as_ref().or(config.level_file.as_ref()) {
        log::info!("loading levels from {}", path.display());
        return LevelFile::open(path, &config.limits);
    }
    LevelFile::parse(DEFAULT_LEVELS, DEFAULT_LEVELS_NAME, &config.limits)
}

/// Why a play-through ended.
enum PlayOutcome {
    Quit,
    /// Won and asked to play again: back to level selection.
    Menu,
}

fn run(
    renderer: &mut Renderer,
    file: &LevelFile,
    scores: &mut ScoreBoard,
    start_level: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut preset = match start_level {
        Some(name) => Some(file.by_name(name)?),
        None => None,
    };
    loop {
        let level = match preset.take() {
            Some(level) => level,
            None => match select_level(renderer, file)? {
                Some(level) => level,
                None => return Ok(()), // quit from the menu
            },
        };
        match play(renderer, file, scores, &level)? {
            PlayOutcome::Quit => return Ok(()),
            PlayOutcome::Menu => continue,
        }
    }
}

/// Level-select screen. `None` means the player quit from the menu.
/// A one-level file skips the menu entirely.
fn select_level(
    renderer: &mut Renderer,
    file: &LevelFile,
) -> Result<Option<ResolvedLevel>, Box<dyn std::error::Error>> {
    let names = file.level_names();
    if names.len() == 1 {
        return Ok(Some(file.by_index(0)?));
    }

    let mut cursor = 0;
    loop {
        renderer.draw_level_select(file.file(), &names, cursor)?;
        match input::read_menu_action()? {
            MenuAction::Up => cursor = cursor.saturating_sub(1),
            MenuAction::Down => cursor = (cursor + 1).min(names.len() - 1),
            MenuAction::Confirm => return Ok(Some(file.by_index(cursor)?)),
            MenuAction::Quit => return Ok(None),
            MenuAction::Other => {}
        }
    }
}

/// The turn loop: draw, block on input, apply. Nothing moves between
/// player actions. Wins are scored once, when the last pit fills.
/// Restarting mid-game rebuilds the level in place; restarting after a
/// win goes back to level selection.
fn play(
    renderer: &mut Renderer,
    file: &LevelFile,
    scores: &mut ScoreBoard,
    level: &ResolvedLevel,
) -> Result<PlayOutcome, Box<dyn std::error::Error>> {
    let legend = file.legend();
    let mut univ = Universe::new(level);
    let best_at_start = scores.best(file.file(), &level.name);

    loop {
        renderer.draw_game(&univ, legend, best_at_start)?;
        match input::read_action()? {
            GameAction::Quit => return Ok(PlayOutcome::Quit),
            GameAction::PlayAgain if univ.game_won => return Ok(PlayOutcome::Menu),
            GameAction::PlayAgain => univ = Universe::new(level),
            GameAction::Other => {} // redraw, e.g. after a resize
            GameAction::Move(dir) => {
                let outcome = univ.eval_action(dir);
                if outcome == MoveOutcome::FilledPit && univ.game_won {
                    if scores.record(file.file(), &level.name, univ.moves_taken) {
                        log::info!(
                            "new best for '{}': {} moves",
                            level.name,
                            univ.moves_taken
                        );
                    }
                }
            }
        }
    }
}
