pub mod exercise;
pub mod import;

pub use exercise::*;
pub use import::*;
