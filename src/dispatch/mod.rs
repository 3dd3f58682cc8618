//! Bounded-concurrency request dispatch.
//!
//! The [`Dispatcher`] drives the whole batched run on one thread of
//! control. Each loop iteration:
//!
//! 1. Top up: submit new requests while below both the target count and
//!    the concurrency cap. A submission failure aborts the run.
//! 2. Drain every completion that is already available, without blocking.
//!    If any were processed, start over - capacity may have opened up.
//! 3. Otherwise, if calls are still in flight, wait for the next
//!    completion and start over. The wait is unbounded.
//! 4. With nothing in flight and the target reached, the run is done.
//!
//! The cap is never exceeded by construction: a request is only submitted
//! while `in_flight < concurrency`. Completions are handled in whatever
//! order the bus delivers them, which need not match submission order.
//!
//! [`run_sequential`] is the degenerate strictly-ordered path used when
//! the concurrency limit is 1. It has no per-call isolation: the first
//! failed request aborts the remaining iterations.

use tokio::sync::mpsc;

use crate::config::RunConfig;
use crate::error::{QrngError, Result};
use crate::request::RequestContext;
use crate::transport::{Completion, CompletionSender, OctetTransport};

mod completion;

pub use completion::{handle_completion, settle, settle_sequential, Aggregate};

/// Reactor loop issuing octet requests with a fixed in-flight cap.
pub struct Dispatcher<T> {
    transport: T,
    cfg: RunConfig,
    agg: Aggregate,
    tx: CompletionSender,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl<T: OctetTransport> Dispatcher<T> {
    /// Create a dispatcher for one run. The transport is exclusively owned
    /// for the run's duration.
    pub fn new(transport: T, cfg: RunConfig) -> Self {
        // The in-flight cap bounds how many completions can be pending at
        // once, so the channel never grows past `concurrency` entries.
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            transport,
            cfg,
            agg: Aggregate::default(),
            tx,
            rx,
        }
    }

    /// Drive the run to completion and return the final counters.
    ///
    /// Returns an error only for fatal conditions (submission failure);
    /// per-request failures land in the aggregate and are judged by the
    /// caller via [`Aggregate::verdict`].
    pub async fn run(mut self) -> Result<Aggregate> {
        loop {
            debug_assert!(self.agg.in_flight() <= self.cfg.concurrency);

            self.fill()?;

            if self.pump_ready() > 0 {
                continue;
            }

            if self.agg.in_flight() > 0 {
                let completion = self.rx.recv().await.ok_or(QrngError::ChannelClosed)?;
                handle_completion(&mut self.agg, completion);
                continue;
            }

            break;
        }

        debug_assert_eq!(self.agg.sent, self.cfg.count);
        debug_assert_eq!(self.agg.succeeded + self.agg.failed, self.agg.sent);
        Ok(self.agg)
    }

    /// Submit requests until the target or the cap is reached.
    fn fill(&mut self) -> Result<()> {
        while self.agg.sent < self.cfg.count && self.agg.in_flight() < self.cfg.concurrency {
            let ctx = RequestContext::new(
                self.agg.sent + 1,
                self.cfg.octets,
                self.cfg.reporting_mode(),
            );
            tracing::debug!("submitting request {}", ctx.request_id);
            self.transport
                .submit(ctx, self.cfg.timeout_ms, self.tx.clone())?;
            self.agg.sent += 1;
        }
        Ok(())
    }

    /// Handle every already-available completion without blocking.
    /// Returns the number processed.
    fn pump_ready(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.rx.try_recv() {
            handle_completion(&mut self.agg, completion);
            processed += 1;
        }
        processed
    }
}

/// Strictly sequential path: one call at a time, in order.
///
/// Validation matches the bounded path, but the first failure aborts the
/// whole run immediately instead of being absorbed into the counters.
pub async fn run_sequential<T: OctetTransport>(transport: &T, cfg: &RunConfig) -> Result<Aggregate> {
    let mut agg = Aggregate::default();
    let mode = cfg.reporting_mode();

    for request_id in 1..=cfg.count {
        let ctx = RequestContext::new(request_id, cfg.octets, mode);
        agg.sent += 1;
        let outcome = transport.request_octets(cfg.octets).await;
        if let Err(err) = settle_sequential(&mut agg, &ctx, outcome) {
            tracing::error!("request {} failed: {}", ctx.request_id, err);
            return Err(err);
        }
    }

    Ok(agg)
}
