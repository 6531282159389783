// src/ui/components/mod.rs
mod circular_level;
mod spirit_tube;
mod text;

pub use circular_level::CircularLevel;
pub use spirit_tube::{SpiritTube, TubeOrientation};
pub use text::{MAX_TEXT_LEN, TextComponent, TextSize};
