//! Transactional email delivery.

pub mod mailersend;
