//! The two submission shapes, normalized by the driver into one trajectory.

pub mod callback;
pub mod vectorized;

pub use callback::{CallbackStrategy, MovingAverageCross, StrategyFactory};
pub use vectorized::{Signal, TargetSchedule};
