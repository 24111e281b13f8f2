//! Rotating hero banner: which promoted title is on screen, and for how long.

pub mod carousel;
pub mod clock;
pub mod rotation;
pub mod scheduler;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RotationError {
    #[error("hero rotation needs at least one item")]
    NoItems,
}

pub use carousel::{HeroCarousel, HeroSnapshot};
pub use clock::{Clock, FixedClock, SystemClock};
pub use rotation::{HeroRotation, RotationConfig, initial_index};
pub use scheduler::{IntervalScheduler, ManualScheduler, ManualTrigger, Scheduler};
