pub mod common;
pub mod localization;
pub mod steering;
pub mod utils;

pub use common::error::{SteeringError, SteeringResult};
pub use common::traits::StateSpace;
pub use common::types::{
    Control, ControllerGains, MeasurementNoise, MotionNoise, State, StateWithCovariance,
};
