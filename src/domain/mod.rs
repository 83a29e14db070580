// Domain layer - Fleet availability model and pure computations
pub mod dashboard;
pub mod equipment;
pub mod error;
pub mod fleet;
pub mod period;
