//! Per-request state.
//!
//! A [`RequestContext`] is created immediately before a call is submitted,
//! travels with the in-flight call, and is consumed exactly once when the
//! call resolves. Move semantics guarantee it is never resolved twice and
//! never leaked on the success or failure paths.

use crate::output::render_octets;

/// How a successfully validated payload is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportingMode {
    /// Print the full payload as hex to stdout (single-request runs).
    HexDump,
    /// Log a one-line byte-count summary tagged with the request id.
    Summary,
    /// Emit nothing (quiet override).
    Silent,
}

/// State for one outstanding remote call.
#[derive(Debug)]
pub struct RequestContext {
    /// 1-based sequence number, unique per run. Diagnostics only.
    pub request_id: u64,
    /// Number of octets the caller demanded; validates the reply size.
    pub expected_len: u64,
    /// Reporting preference, derived once from the run configuration.
    pub mode: ReportingMode,
}

impl RequestContext {
    /// Create a context for the next request to submit.
    pub fn new(request_id: u64, expected_len: u64, mode: ReportingMode) -> Self {
        Self {
            request_id,
            expected_len,
            mode,
        }
    }

    /// Report a validated payload according to the reporting mode.
    pub fn report_success(&self, octets: &[u8]) {
        match self.mode {
            ReportingMode::HexDump => println!("{}", render_octets(octets)),
            ReportingMode::Summary => {
                tracing::info!("request {} completed: {} bytes", self.request_id, octets.len());
            }
            ReportingMode::Silent => {}
        }
    }
}
