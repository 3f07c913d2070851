//! Printer-facing subsystem: digest-authenticated HTTP client and the
//! status/job document accessors built on top of it.

pub mod client;
pub mod status;

pub use client::PrinterClient;
pub use status::{Job, JobStatus, PrinterState, Status};
