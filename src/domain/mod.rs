pub mod entity;
pub mod tile;
