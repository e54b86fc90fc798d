//! Numerical reductions
//!
//! The three leaves of the pipeline: zero-crossing detection over 1-D
//! series, oscillation period/amplitude extraction from the crossing
//! indices, and weighted spatial reduction of gridded fields.

pub mod crossings;
pub mod oscillation;
pub mod reduce;
