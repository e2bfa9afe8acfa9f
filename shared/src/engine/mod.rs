//! Roast timeline engine
//!
//! Pure, synchronous functions over an event list. Callers pass every input
//! explicitly (including the roast start time and "now") and recompute from
//! the whole list after any change; nothing here keeps state between calls.

mod milestones;
mod pause;
mod phase;
mod resample;
mod ror;
mod samples;
mod summary;

pub use milestones::*;
pub use pause::*;
pub use phase::*;
pub use resample::*;
pub use ror::*;
pub use samples::*;
pub use summary::*;
