//! # qrng-client
//!
//! D-Bus client for the `lv.lumii.qrng` random octet service.
//!
//! Fetches batches of random octets over the bus using one blocking call
//! path and one non-blocking, bounded-concurrency path. The core is the
//! bounded dispatcher: it keeps up to a fixed number of calls in flight on
//! a single connection, correlates every reply (or failure) back to the
//! request that produced it, and drives the run until all work resolves or
//! a fatal error occurs.
//!
//! ## Architecture
//!
//! - **transport**: narrow facade over the bus; the `zbus`-backed
//!   implementation lives behind the [`transport::OctetTransport`] trait
//! - **dispatch**: the bounded reactor loop, the completion handler and
//!   the run-scoped counters
//! - **request**: per-call context, created at submission and consumed
//!   exactly once on resolution
//! - **config**: CLI parsing and startup validation
//!
//! ## Example
//!
//! ```ignore
//! use qrng_client::{Dispatcher, RunConfig};
//! use qrng_client::transport::QrngBus;
//!
//! # async fn run(cfg: RunConfig) -> qrng_client::Result<()> {
//! let bus = QrngBus::connect(cfg.system).await?;
//! let aggregate = Dispatcher::new(bus, cfg).run().await?;
//! aggregate.verdict()
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod output;
pub mod request;
pub mod transport;

pub use config::{Cli, RunConfig};
pub use dispatch::{run_sequential, Aggregate, Dispatcher};
pub use error::{QrngError, Result};
