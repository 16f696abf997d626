/// Universe: the live state of one level play-through.
///
/// Two layers, kept separate on purpose:
///   - `squares` — the terrain grid (floor, wall, pit, filled pit).
///     Mutated only when a boulder fills a pit.
///   - Player and boulders — overlay entities with tracked positions.
///     A vacated square is whatever the terrain says it is; nothing is
///     ever "restored" into the grid.
///
/// Each accepted action is atomic: either the full player-plus-boulder
/// transition applies, or nothing changes. Illegal moves are quiet no-ops,
/// not errors. Out-of-grid coordinates read as Wall, which together with
/// the parser's blank border keeps every bounds check uniform.

use crate::domain::entity::{Boulder, Direction, Player, Pos};
use crate::domain::tile::Square;
use crate::sim::level::{ResolvedLevel, Role};

/// What an action did; the caller only needs this for display.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveOutcome {
    /// Nothing happened: blocked, or the game was already won.
    Rejected,
    /// Player stepped onto an open square.
    Moved,
    /// Player pushed a boulder one square.
    Pushed,
    /// The pushed boulder fell into a pit and filled it.
    FilledPit,
}

pub struct Universe {
    pub level_name: String,
    squares: Vec<Vec<Square>>,
    pub player: Player,
    pub boulders: Vec<Boulder>,
    pub moves_taken: u32,
    pub pits_remaining: usize,
    pub game_won: bool,
}

impl Universe {
    /// Build from a resolved level: map legend characters to terrain,
    /// lifting the player and boulder marks out as entities (the square
    /// under an entity is floor).
    pub fn new(level: &ResolvedLevel) -> Self {
        let legend = level.legend;
        let mut squares = Vec::with_capacity(level.map.len());
        let mut player = Player::new(0, 0);
        let mut boulders = Vec::new();
        let mut pits = 0;

        for (y, row) in level.map.iter().enumerate() {
            let mut out = Vec::with_capacity(row.len());
            for (x, &ch) in row.iter().enumerate() {
                let square = match legend.role_of(ch) {
                    Some(Role::Wall) => Square::Wall,
                    Some(Role::Pit) => {
                        pits += 1;
                        Square::Pit
                    }
                    Some(Role::Player) => {
                        player = Player::new(y, x);
                        Square::Floor
                    }
                    Some(Role::Boulder) => {
                        boulders.push(Boulder::new(y, x));
                        Square::Floor
                    }
                    // Floor symbol, blank padding, and anything unmapped.
                    Some(Role::Floor) | None => Square::Floor,
                };
                out.push(square);
            }
            squares.push(out);
        }

        Universe {
            level_name: level.name.clone(),
            squares,
            player,
            boulders,
            moves_taken: 0,
            pits_remaining: pits,
            game_won: pits == 0,
        }
    }

    pub fn height(&self) -> usize {
        self.squares.len()
    }

    pub fn width(&self) -> usize {
        self.squares.first().map_or(0, |r| r.len())
    }

    /// Terrain at a position; out of bounds reads as Wall.
    pub fn square_at(&self, pos: Pos) -> Square {
        self.squares
            .get(pos.y)
            .and_then(|row| row.get(pos.x))
            .copied()
            .unwrap_or(Square::Wall)
    }

    fn boulder_at(&self, pos: Pos) -> Option<usize> {
        self.boulders.iter().position(|b| b.pos == pos)
    }

    /// Resolve one movement action. Increments the move counter iff the
    /// action is accepted; a win makes all further actions no-ops.
    pub fn eval_action(&mut self, dir: Direction) -> MoveOutcome {
        if self.game_won {
            return MoveOutcome::Rejected;
        }
        let Some(dest) = self.player.pos.step(dir) else {
            return MoveOutcome::Rejected;
        };
        if !self.square_at(dest).is_open() {
            return MoveOutcome::Rejected;
        }

        let outcome = match self.boulder_at(dest) {
            None => MoveOutcome::Moved,
            Some(idx) => {
                let Some(beyond) = dest.step(dir) else {
                    return MoveOutcome::Rejected;
                };
                if !self.square_at(beyond).is_open() || self.boulder_at(beyond).is_some() {
                    return MoveOutcome::Rejected;
                }
                if self.square_at(beyond).is_pit() {
                    self.boulders.remove(idx);
                    self.squares[beyond.y][beyond.x] = Square::FilledPit;
                    self.pits_remaining -= 1;
                    if self.pits_remaining == 0 {
                        self.game_won = true;
                    }
                    MoveOutcome::FilledPit
                } else {
                    self.boulders[idx].pos = beyond;
                    MoveOutcome::Pushed
                }
            }
        };

        self.player.pos = dest;
        self.moves_taken += 1;
        outcome
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
