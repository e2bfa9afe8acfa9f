//! Roast timeline session runtime
//!
//! Wraps the pure engine in `shared` with what a live roast needs: the event
//! log and pause accounting of the active roast, a fixed-rate ticker that
//! republishes the phase state, configuration loading and the replay tooling
//! behind the `roastline` binary.

pub mod config;
pub mod error;
pub mod replay;
pub mod services;

pub use config::TimelineConfig;
pub use error::{ErrorResponse, SessionError, SessionResult};
pub use replay::{build_report, compare, load_replay, run_live, ReplayFile, ReplayReport};
pub use services::{
    Clock, DerivedCache, ManualClock, RoastSessionController, SessionManager, SessionSettings,
    SystemClock, TickerRegistry,
};
