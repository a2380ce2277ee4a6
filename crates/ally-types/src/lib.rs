//! Shared domain types for the Ally platform backend.
//!
//! This crate contains the core domain types used across the workspace:
//! conversation turns, generation payloads, access tokens, system settings,
//! appointments, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror, secrecy.

pub mod chat;
pub mod config;
pub mod credential;
pub mod error;
pub mod generation;
pub mod schedule;
pub mod settings;
