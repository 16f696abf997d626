/// Entities: the Player and Boulders live on top of the terrain grid,
/// never inside it. A vacated square is whatever the terrain says it is,
/// so an entity's old position never has to be recomputed.

/// Movement direction, one square per accepted action.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Offset as (dy, dx) in grid coordinates (row, column).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// One decoded input per turn. `Other` covers every unbound key and the
/// resize notification; the loop treats it as a no-op that redraws.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameAction {
    Move(Direction),
    Quit,
    PlayAgain,
    Other,
}

/// Grid position, row-major like the level map.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Pos {
    pub y: usize,
    pub x: usize,
}

impl Pos {
    pub fn new(y: usize, x: usize) -> Self {
        Pos { y, x }
    }

    /// Position one step in `dir`, or None if that would leave the grid.
    /// The padded border means a well-formed level never hits the None arm,
    /// but the check keeps the coordinate math total.
    pub fn step(self, dir: Direction) -> Option<Pos> {
        let (dy, dx) = dir.delta();
        let y = self.y as i32 + dy;
        let x = self.x as i32 + dx;
        if y < 0 || x < 0 {
            None
        } else {
            Some(Pos::new(y as usize, x as usize))
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Player {
    pub pos: Pos,
}

impl Player {
    pub fn new(y: usize, x: usize) -> Self {
        Player { pos: Pos::new(y, x) }
    }
}

/// Boulders keep scan order from level load; the order only matters for
/// the "boulders remaining" count shown in the status line.
#[derive(Clone, Copy, Debug)]
pub struct Boulder {
    pub pos: Pos,
}

impl Boulder {
    pub fn new(y: usize, x: usize) -> Self {
        Boulder { pos: Pos::new(y, x) }
    }
}
