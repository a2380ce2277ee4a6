//! Observability setup for Ally: structured logging and optional
//! OpenTelemetry trace export.

pub mod tracing_setup;
