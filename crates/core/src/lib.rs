#![forbid(unsafe_code)]

pub mod model;
pub mod render;
pub mod time;

pub use time::Clock;
