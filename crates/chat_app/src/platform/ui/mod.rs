pub mod constants;
pub mod input;
pub mod render;
pub mod terminal;
