//! Simulation results read back after a run.

pub mod heads;

pub use heads::{HeadFile, HeadFileError, HeadRecord, Precision};
