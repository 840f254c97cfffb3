pub mod escape;
pub mod frame;
pub mod gradient;
pub mod grid;
pub mod mapping;
