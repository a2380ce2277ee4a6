//! Vertex AI `generateContent` transport.

pub mod client;
