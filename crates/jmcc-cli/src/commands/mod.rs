//! Command implementations.
//!
//! Each command reads a snapshot, runs the alert engine, and writes its
//! result through [`OutputFormat`](crate::output::OutputFormat).

mod dispatch;
mod evaluate;
mod metrics;

pub use dispatch::DispatchCommand;
pub use evaluate::EvaluateCommand;
pub use metrics::MetricsCommand;
