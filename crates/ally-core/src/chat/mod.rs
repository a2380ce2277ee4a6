//! Conversation session management.
//!
//! `ConversationSession` holds the ordered turn history of one conversation;
//! `ChatService` owns every live session and drives the exchange with the
//! upstream generation endpoint.

pub mod service;
pub mod session;
