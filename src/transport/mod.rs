//! Transport facade over the message bus.
//!
//! The dispatcher never touches the bus directly. It sees one trait,
//! [`OctetTransport`], with two operations:
//!
//! - `submit` - enqueue an asynchronous call without blocking; the outcome
//!   arrives later as a [`Completion`] on the channel handed in at
//!   submission time
//! - `request_octets` - blocking single-shot call used by the sequential
//!   path
//!
//! # Architecture
//!
//! ```text
//! Dispatcher ─ submit ─► Transport ─► [bus] ─► Completion ─► mpsc channel
//!     ▲                                                          │
//!     └───────────────── try_recv / recv ───────────────────────┘
//! ```
//!
//! The two remote methods return differently shaped status words, so the
//! decoded status keeps its wire width and signedness in [`ReplyStatus`]
//! instead of collapsing both into one integer type.

use std::fmt;

use tokio::sync::mpsc;

use crate::error::Result;
use crate::request::RequestContext;

mod bus;

pub use bus::{QrngBus, INTERFACE_NAME, OBJECT_PATH, SERVICE_NAME};

/// Sender half of the completion channel, cloned into each in-flight call.
pub type CompletionSender = mpsc::UnboundedSender<Completion>;

/// Outcome of one bus call: a decoded reply, or the error that resolved it.
pub type CallOutcome = Result<Reply>;

/// Status word of a decoded reply.
///
/// The batched method returns a signed 32-bit status, the single-shot
/// method an unsigned one. Zero means success in both; the two shapes are
/// never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    /// Status of a `GenerateOctetsEx` reply.
    Batched(i32),
    /// Status of a `GenerateOctets` reply.
    Single(u32),
}

impl ReplyStatus {
    /// Whether the service reported success.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, ReplyStatus::Batched(0) | ReplyStatus::Single(0))
    }

    /// The raw status code, widened for diagnostics.
    #[inline]
    pub fn code(&self) -> i64 {
        match *self {
            ReplyStatus::Batched(code) => i64::from(code),
            ReplyStatus::Single(code) => i64::from(code),
        }
    }
}

impl fmt::Display for ReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A structurally valid decoded reply.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Service-reported status word.
    pub status: ReplyStatus,
    /// Variable-length octet payload.
    pub octets: Vec<u8>,
}

/// One resolved call, delivered over the completion channel.
#[derive(Debug)]
pub struct Completion {
    /// Context created at submission time, consumed by the handler.
    pub ctx: RequestContext,
    /// What happened to the call.
    pub outcome: CallOutcome,
}

/// Facade the dispatcher drives the bus through.
#[allow(async_fn_in_trait)]
pub trait OctetTransport: Send + Sync {
    /// Enqueue an asynchronous octet request without blocking.
    ///
    /// The context is moved into the in-flight call and comes back inside
    /// the [`Completion`] sent to `reply_to`, exactly once. An `Err` here
    /// means the act of enqueuing failed and is fatal to the run.
    fn submit(
        &self,
        ctx: RequestContext,
        timeout_ms: u64,
        reply_to: CompletionSender,
    ) -> Result<()>;

    /// Single-shot octet request; resolves when the reply arrives.
    async fn request_octets(&self, count: u64) -> CallOutcome;
}
