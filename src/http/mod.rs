//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Mode dispatcher (serving)
//!     → server.rs (configure runtime, deploy router, bind, join)
//!     → request.rs (assign + propagate request ID)
//!     → handlers.rs (/health, /info, /apps)
//! ```

pub mod handlers;
pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AxumLauncher, LaunchError, ServerLauncher};
