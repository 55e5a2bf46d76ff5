//! Observability utilities.
//!
//! Structured logging goes through `tracing`; [`init_tracing`] installs an
//! `EnvFilter`-driven subscriber. Orchestrator runs report their lifecycle to
//! a [`RunObserver`].

mod observer;
mod subscriber;

pub use observer::{LoggingRunObserver, NoOpRunObserver, RunObserver, SpanTimer};
pub use subscriber::{init_tracing, LogConfig};
