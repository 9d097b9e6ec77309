//! # Scheduler Server
//!
//! JSON-over-HTTP front end for [`scheduler_core`]. Task endpoints sit
//! behind an optional shared password: when one is configured, clients sign
//! in once and present the issued token in the `token` cookie.
//!
//! - [`app`]: router assembly and the serve loop
//! - [`handlers`]: one handler per endpoint
//! - [`auth`]: token issuing, verification and the guarding middleware
//! - [`config`]: layered configuration (file, environment)
//! - [`cli`]: command-line arguments
//! - [`error`]: HTTP mapping of failures

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;

pub use app::{build_router, serve, AppState};
