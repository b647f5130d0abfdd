//! Weighted risk indices: the generic calculator, its static
//! configuration tables, and the per-region scoring service.

pub mod calculator;
pub mod index;
pub mod weights;
