// shared/src/lib.rs

pub mod clock;
pub mod config;

pub use clock::{Clock, SystemClock};
pub use config::Config;
