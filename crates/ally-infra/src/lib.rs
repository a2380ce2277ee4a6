//! Infrastructure layer for Ally.
//!
//! Contains implementations of the port traits defined in `ally-core`:
//! SQLite settings storage, the Vertex AI `generateContent` client, Google
//! access-token providers, and the MailerSend email sender.

pub mod config;
pub mod credential;
pub mod mail;
pub mod sqlite;
pub mod vertex;
