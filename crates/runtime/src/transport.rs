//! Transport contract and handshake completion plumbing.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::sync::oneshot;
use wd_protocol::{CapabilityRequest, NewSessionData};

use crate::error::{Error, Result};

/// Pending completion of a session-creation handshake.
///
/// Exactly one of the two resolution paths fires for a given handshake:
/// success with the new-session payload, or failure with the transport's
/// error, unmodified. Dropping the handle before the outcome arrives is
/// tolerated; a late completion against a dropped handle is a no-op.
#[derive(Debug)]
pub struct HandshakeHandle {
    rx: oneshot::Receiver<Result<NewSessionData>>,
}

impl HandshakeHandle {
    /// Suspends until the handshake resolves one way or the other.
    pub async fn wait(self) -> Result<NewSessionData> {
        self.rx.await.map_err(|_| Error::ChannelClosed)?
    }
}

/// Resolving half of a [`HandshakeHandle`].
///
/// Both resolution methods consume the completer, so at most one outcome
/// can ever be delivered and neither path can fire twice.
#[derive(Debug)]
pub struct HandshakeCompleter {
    tx: oneshot::Sender<Result<NewSessionData>>,
}

impl HandshakeCompleter {
    /// Creates a linked completer/handle pair.
    pub fn pair() -> (HandshakeCompleter, HandshakeHandle) {
        let (tx, rx) = oneshot::channel();
        (HandshakeCompleter { tx }, HandshakeHandle { rx })
    }

    /// Resolves the handshake with the driver's new-session payload.
    pub fn succeed(self, data: NewSessionData) {
        // Send failure means the handle was dropped; the caller gave up.
        let _ = self.tx.send(Ok(data));
    }

    /// Resolves the handshake with the transport's error, unmodified.
    pub fn fail(self, error: Error) {
        let _ = self.tx.send(Err(error));
    }
}

/// Contract the session layer consumes for driving a remote session.
///
/// Implementations must register the handshake completion before
/// triggering the wire request, so no outcome can be missed between
/// registration and trigger. The transport is shared, not owned, by the
/// session layer and must itself serialize concurrent protocol calls.
pub trait Transport: Send + Sync {
    /// Triggers a session-creation request and returns the pending
    /// completion handle for its outcome.
    fn create_session(&self, request: CapabilityRequest) -> HandshakeHandle;

    /// Closes the active session, resolving with the driver's response
    /// payload on success.
    fn close_session(&self) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + '_>>;
}
