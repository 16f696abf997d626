pub mod input;
pub mod layout;
pub mod renderer;
pub mod text;
