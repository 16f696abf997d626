pub mod level;
pub mod scores;
pub mod universe;
