//! Simulation driver, constraint validation, and the run trajectory.

pub mod constraints;
pub mod driver;
pub mod trajectory;

pub use constraints::{validate_targets, within_leverage, LEVERAGE_EPSILON, LEVERAGE_LIMIT};
pub use driver::Driver;
pub use trajectory::{Trajectory, TrajectoryPoint};
