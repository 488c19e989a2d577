//! HTTP server for the scheduler daemon.
//!
//! Provides the REST API over the project store plus static serving of the
//! bundled front-end. Response shapes are frozen for compatibility with
//! existing browser clients: several "not found" outcomes are reported
//! in-band with HTTP 200 rather than through the status code.

mod assets;
mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;
