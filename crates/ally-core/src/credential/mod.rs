//! Access-token abstraction.
//!
//! `TokenProvider` hands out a token that is guaranteed fresh. Implementations
//! own caching and refresh, so callers ask for a token before every use.

pub mod provider;
