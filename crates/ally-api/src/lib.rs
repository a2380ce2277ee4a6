//! Ally application layer: REST API, CLI commands, and service wiring.
//!
//! The `ally` binary (`src/main.rs`) parses the command line and dispatches
//! into [`cli`]; `ally serve` mounts [`http::router::build_router`].

pub mod cli;
pub mod http;
pub mod state;
