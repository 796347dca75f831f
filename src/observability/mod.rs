//! Observability for depot
//!
//! Structured JSON logging only. Principles:
//!
//! 1. Observability is read-only; it never changes an operation's outcome
//! 2. Synchronous, no background threads, no buffering
//! 3. One log line = one event, deterministic field ordering
//! 4. Failures are surfaced through `DepotError`, never through logs.
//!    The single exception is `clear`, whose per-child delete failures
//!    are logged at WARN and skipped
//!
//! # Usage
//!
//! ```ignore
//! use depot::observability::Logger;
//!
//! Logger::trace("RECORD_SAVED", &[("path", "messages/m.json")]);
//! ```

mod logger;

pub use logger::{Logger, Severity};
