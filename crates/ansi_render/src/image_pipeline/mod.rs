pub mod delay;
pub mod gif_timing;
pub mod loader;
pub mod resize;
