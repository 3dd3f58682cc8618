//! Completion handling and result aggregation.
//!
//! Every resolved call passes through [`handle_completion`] exactly once.
//! Validation short-circuits at the first failure, in a fixed order:
//!
//! 1. transport error (the call itself failed)
//! 2. decode failure (the reply body was structurally invalid)
//! 3. non-zero service status
//! 4. payload length mismatch
//!
//! A transport error must never be mistaken for a service-level error, and
//! the length check only runs against a structurally valid decode. Local
//! failures are absorbed into the aggregate; they never unwind the
//! dispatch loop.

use crate::error::{QrngError, Result};
use crate::request::RequestContext;
use crate::transport::{CallOutcome, Completion};

/// Run-scoped counters shared by the completion handler (writer) and the
/// dispatch loop (reader). Everything runs on one thread of control, so
/// plain integers suffice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    /// Requests submitted so far.
    pub sent: u64,
    /// Requests that resolved with a validated payload.
    pub succeeded: u64,
    /// Requests that resolved with any failure.
    pub failed: u64,
}

impl Aggregate {
    /// Requests submitted but not yet resolved.
    #[inline]
    pub fn in_flight(&self) -> u64 {
        self.sent - (self.succeeded + self.failed)
    }

    /// Binary verdict for the whole run: one failed request fails the run.
    pub fn verdict(&self) -> Result<()> {
        if self.failed > 0 {
            Err(QrngError::Failed {
                failed: self.failed,
                sent: self.sent,
            })
        } else {
            Ok(())
        }
    }
}

/// Validate one resolved call, returning the payload on full success.
///
/// Steps 1 and 2 of the validation order arrive already folded into the
/// outcome (`Transport` and `Decode` variants); status and length are
/// checked here, in that order.
pub fn settle(outcome: CallOutcome, expected_len: u64) -> Result<Vec<u8>> {
    let reply = outcome?;
    if !reply.status.is_success() {
        return Err(QrngError::Status(reply.status));
    }
    let actual = reply.octets.len() as u64;
    if actual != expected_len {
        return Err(QrngError::LengthMismatch {
            expected: expected_len,
            actual,
        });
    }
    Ok(reply.octets)
}

/// Consume one completion: validate, count, report.
pub fn handle_completion(agg: &mut Aggregate, completion: Completion) {
    let Completion { ctx, outcome } = completion;
    match settle(outcome, ctx.expected_len) {
        Ok(octets) => {
            agg.succeeded += 1;
            ctx.report_success(&octets);
        }
        Err(err) => {
            agg.failed += 1;
            tracing::warn!("request {} failed: {}", ctx.request_id, err);
        }
    }
}

/// Validate one sequential-path call. Same checks as the bounded path, but
/// the first failure is returned to the caller, which aborts the run.
pub fn settle_sequential(
    agg: &mut Aggregate,
    ctx: &RequestContext,
    outcome: CallOutcome,
) -> Result<()> {
    match settle(outcome, ctx.expected_len) {
        Ok(octets) => {
            agg.succeeded += 1;
            ctx.report_success(&octets);
            Ok(())
        }
        Err(err) => {
            agg.failed += 1;
            Err(err)
        }
    }
}
