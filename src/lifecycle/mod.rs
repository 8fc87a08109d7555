//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Base container → Resolve config → Record identity → Legacy properties
//!     → Service container → Bind deployment → Register with web → Dispatch
//!
//! Dispatch (dispatch.rs):
//!     Serving: configure → deploy → initialize → start → join
//!     Headless: initialize
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C or trigger → Stop accepting → Drain connections → join returns
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then containers, then listeners
//! - Application state is ready before the first connection is accepted
//! - Listeners start last (traffic only when ready)

pub mod dispatch;
pub mod identity;
pub mod shutdown;
pub mod startup;

pub use dispatch::{dispatch, DispatchContext};
pub use identity::{ServiceIdentity, UNKNOWN_SERVICE};
pub use shutdown::Shutdown;
pub use startup::Bootstrap;
