//! # promptrail-tracing
//!
//! Observation tracing that never changes control flow.
//!
//! - [`Tracer::observe`] wraps any fallible future and records its input,
//!   output or error, and timing.
//! - Records are shipped in the background to a [`TraceCollector`] such as
//!   [`LangfuseCollector`]. Delivery failures are logged and dropped.
//! - [`init_logging`] installs the `tracing-subscriber` used by binaries.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod collector;
pub mod langfuse;
pub mod record;
pub mod subscriber;
pub mod tracer;

pub use collector::{MemoryCollector, TraceCollector};
pub use langfuse::LangfuseCollector;
pub use record::TraceRecord;
pub use subscriber::{init_logging, LogConfig};
pub use tracer::Tracer;
