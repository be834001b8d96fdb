//! Street Traffic Simulation Library
//!
//! A discrete-tick traffic simulation that can run independently or behind
//! the interactive command session in the binary.

pub mod simulation;
