pub mod pacing;
pub mod player;
pub mod series;
