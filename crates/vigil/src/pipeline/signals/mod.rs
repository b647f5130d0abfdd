//! Signal admission and time-period aggregation.

pub mod aggregation;
pub mod intake;
pub mod quality;
