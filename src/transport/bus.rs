//! zbus-backed transport for the QRNG service.
//!
//! Owns the single bus connection (through the service proxy) for the
//! lifetime of one run. Dropping the transport releases the connection,
//! which implicitly discards replies for any calls still outstanding.

use crate::error::{QrngError, Result};
use crate::request::RequestContext;
use crate::transport::{CallOutcome, Completion, CompletionSender, OctetTransport, Reply, ReplyStatus};

/// Well-known name the service is reachable at.
pub const SERVICE_NAME: &str = "lv.lumii.qrng";
/// Object path of the generator.
pub const OBJECT_PATH: &str = "/lv/lumii/qrng/RemoteQrngXorLinuxRng";
/// Interface the generator methods live on.
pub const INTERFACE_NAME: &str = "lv.lumii.qrng.Rng";

/// Single-shot method: `(count: t) -> (status: u, octets: ay)`.
const GENERATE_OCTETS: &str = "GenerateOctets";
/// Batched method: `(count: t, timeout_ms: t) -> (status: i, octets: ay)`.
const GENERATE_OCTETS_EX: &str = "GenerateOctetsEx";

/// Connection to the QRNG service over the session or system bus.
pub struct QrngBus {
    proxy: zbus::Proxy<'static>,
}

impl QrngBus {
    /// Connect to the bus and resolve the service proxy.
    ///
    /// Uses the session bus unless `system` is set. Any failure here is
    /// fatal and happens before a single request is dispatched.
    pub async fn connect(system: bool) -> Result<Self> {
        let connection = if system {
            zbus::Connection::system().await
        } else {
            zbus::Connection::session().await
        }
        .map_err(QrngError::Connect)?;

        let proxy = zbus::Proxy::new(&connection, SERVICE_NAME, OBJECT_PATH, INTERFACE_NAME)
            .await
            .map_err(QrngError::Connect)?;

        Ok(Self { proxy })
    }
}

/// Call the batched method and decode its `(i32, ay)` reply shape.
async fn call_batched(proxy: &zbus::Proxy<'static>, count: u64, timeout_ms: u64) -> CallOutcome {
    let message = proxy
        .call_method(GENERATE_OCTETS_EX, &(count, timeout_ms))
        .await?;
    let body = message.body();
    let (status, octets): (i32, Vec<u8>) = body.deserialize().map_err(QrngError::Decode)?;
    Ok(Reply {
        status: ReplyStatus::Batched(status),
        octets,
    })
}

impl OctetTransport for QrngBus {
    fn submit(
        &self,
        ctx: RequestContext,
        timeout_ms: u64,
        reply_to: CompletionSender,
    ) -> Result<()> {
        let proxy = self.proxy.clone();
        let count = ctx.expected_len;

        tokio::spawn(async move {
            let outcome = call_batched(&proxy, count, timeout_ms).await;
            // The receiver only goes away when the run has already been
            // torn down; the late reply is dropped with the connection.
            if reply_to.send(Completion { ctx, outcome }).is_err() {
                tracing::debug!("completion arrived after the run ended");
            }
        });

        Ok(())
    }

    async fn request_octets(&self, count: u64) -> CallOutcome {
        let message = self.proxy.call_method(GENERATE_OCTETS, &(count,)).await?;
        let body = message.body();
        let (status, octets): (u32, Vec<u8>) = body.deserialize().map_err(QrngError::Decode)?;
        Ok(Reply {
            status: ReplyStatus::Single(status),
            octets,
        })
    }
}
