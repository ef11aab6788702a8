//! Safe Following Distance Simulation Library
//!
//! A car-following simulation core that can run headless or be driven by an
//! external renderer.

pub mod simulation;
