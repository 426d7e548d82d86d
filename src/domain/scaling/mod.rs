//! Scaling domain - fitted feature transforms

mod robust;

pub use robust::{FittedRobustScaler, RobustScaler};
