//! Session services for live roasts

pub mod cache;
pub mod clock;
pub mod controller;
pub mod event_log;
pub mod manager;
pub mod ticker;

pub use cache::DerivedCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{RoastSessionController, SessionSettings};
pub use event_log::EventLog;
pub use manager::SessionManager;
pub use ticker::TickerRegistry;
