//! Report assembly and rendering.

pub mod generator;
pub mod views;

pub use generator::*;
pub use views::*;
