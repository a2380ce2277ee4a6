//! Business logic and port trait definitions for the Ally backend.
//!
//! This crate defines the "ports" (generation client, token source, settings
//! repository, notification sender) that the infrastructure layer implements.
//! It depends only on `ally-types` -- never on `ally-infra` or any HTTP/database crate.

pub mod chat;
pub mod credential;
pub mod llm;
pub mod notification;
pub mod settings;
