#![forbid(unsafe_code)]

pub mod counter;
pub mod model;
pub mod text;
pub mod time;

pub use time::Clock;
