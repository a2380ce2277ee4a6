//! System settings (feature toggles) persistence abstraction and service.

pub mod repository;
pub mod service;
