//! Domain models for the roast timeline

mod event;
mod phase;
mod roast;
mod session;
mod thermal;

pub use event::*;
pub use phase::*;
pub use roast::*;
pub use session::*;
pub use thermal::*;
