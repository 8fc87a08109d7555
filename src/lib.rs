//! Service bootstrap orchestrator.
//!
//! # Architecture Overview
//!
//! ```text
//!   StartupArgs
//!       │
//!       ▼
//!   ┌──────────────┐   ┌─────────────────┐   ┌──────────────────┐
//!   │ base         │──▶│ config resolver │──▶│ service          │
//!   │ container    │   │ core + map      │   │ container        │
//!   └──────────────┘   └─────────────────┘   └────────┬─────────┘
//!                                                      │
//!                     deployment context ◀─────────────┤
//!                     web registration   ◀─────────────┤
//!                                                      ▼
//!                                            ┌──────────────────┐
//!                                            │ mode dispatcher  │
//!                                            └───┬──────────┬───┘
//!                                    headless    │          │   serving
//!                                                ▼          ▼
//!                                       initializer   configure → deploy →
//!                                                     initializer → start → join
//! ```

pub mod app;
pub mod args;
pub mod config;
pub mod container;
pub mod deployment;
pub mod error;
pub mod http;
pub mod legacy;
pub mod lifecycle;
pub mod modules;
pub mod observability;
pub mod web;

pub use args::{RunMode, StartupArgs};
pub use config::ServiceConfig;
pub use container::Container;
pub use error::{BootstrapError, StartupFailure};
pub use lifecycle::Bootstrap;
