//! Shared types and the roast timeline engine
//!
//! This crate contains the event and phase models used by the session
//! controller, the WASM bindings and any other client, together with the pure
//! engine functions that derive roast phases, Rate of Rise and comparison
//! grids from an event list. Nothing in here performs I/O or reads a clock.

pub mod engine;
pub mod models;
pub mod types;
pub mod validation;

pub use engine::*;
pub use models::*;
pub use types::*;
pub use validation::*;
