/// Square kinds and their properties.
/// Properties are queried via methods, not stored as flags,
/// so square semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Square {
    Floor,
    Wall,      // blocks player and boulders alike
    Pit,       // swallows a boulder, becoming FilledPit
    FilledPit, // walkable, same as Floor from then on
}

impl Square {
    /// Does this square block movement?
    pub fn is_wall(self) -> bool {
        matches!(self, Square::Wall)
    }

    /// Does a boulder pushed onto this square fall in and fill it?
    pub fn is_pit(self) -> bool {
        matches!(self, Square::Pit)
    }

    /// Can the player stand here, or a boulder come to rest here?
    pub fn is_open(self) -> bool {
        !self.is_wall()
    }
}

impl Default for Square {
    fn default() -> Self {
        Square::Floor
    }
}
