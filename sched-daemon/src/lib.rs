//! Quantum Scheduler daemon library - HTTP server components.
//!
//! This library exposes:
//! - Request router and handlers over the project store
//! - Static asset serving for the bundled front-end
//! - Port allocation with fallback probing

pub mod config;
pub mod migrate;
pub mod port;
pub mod server;
