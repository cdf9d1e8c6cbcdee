//! The session aggregate and its lifecycle state machine.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tokio::sync::broadcast;
use wd_protocol::{Capabilities, CapabilityRequest, NewSessionData, apply_headless};
use wd_runtime::{Result, Transport};

use crate::queue::CommandQueue;
use crate::settings::SessionSettings;

/// Lifecycle states of a session attempt.
///
/// `Connecting` falls back to `Idle` when the handshake fails;
/// `Finished` is terminal for the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Connecting,
    Active,
    Finished,
}

/// Lifecycle notifications fanned out to external listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The session ended; carries the reason passed to `finished`.
    Finished { reason: String },
}

/// Launch-time options applied when a session is created.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaunchOptions {
    /// Request a headless browser launch.
    pub headless: bool,
}

impl LaunchOptions {
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }
}

/// A single remote automation session against a driver endpoint.
///
/// Owns its capability state and command queue exclusively; holds a
/// shared, non-owning handle to the transport. All operations take
/// `&mut self`, so overlapping `create`/`close` calls on one session are
/// rejected at compile time rather than left as a caller error.
pub struct Session {
    settings: SessionSettings,
    transport: Arc<dyn Transport>,
    state: SessionState,
    session_id: Option<String>,
    request: CapabilityRequest,
    negotiated: Option<Value>,
    queue: CommandQueue,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Creates a session in the `Idle` state.
    ///
    /// The desired capability set is computed here, exactly once per
    /// attempt: defaults overlaid with the user overrides, dialect
    /// detected, and the wire block seeded from the settings' capability
    /// block.
    pub fn new(settings: SessionSettings, transport: Arc<dyn Transport>) -> Self {
        let request =
            CapabilityRequest::compute(&settings.desired_capabilities, &settings.capabilities);
        let (events, _) = broadcast::channel(16);

        Self {
            settings,
            transport,
            state: SessionState::Idle,
            session_id: None,
            request,
            negotiated: None,
            queue: CommandQueue::new(),
            events,
        }
    }

    /// Runs the session-creation handshake.
    ///
    /// Callers are expected to consult [`SessionSettings::start_session`]
    /// before invoking this; the session does not gate itself on that
    /// flag. Headless injection and the wire-block merge happen first,
    /// then the transport's pending-completion handle is awaited. Exactly
    /// one outcome arrives: on success the session becomes `Active` with
    /// the driver's id and negotiated capabilities; on failure the
    /// transport error surfaces unmodified and the session returns to
    /// `Idle`. No retry happens here.
    pub async fn create(&mut self, launch: LaunchOptions) -> Result<NewSessionData> {
        let started = Instant::now();
        let endpoint = self.settings.endpoint();

        let family = self.request.browser_family();
        // The wire block only needs refreshing when an injector actually
        // mutated the desired tree; otherwise it already reflects it.
        if apply_headless(self.request.desired_mut(), family, launch.headless) {
            self.request.sync_wire();
        }

        tracing::info!(%endpoint, "connecting to webdriver endpoint");
        self.state = SessionState::Connecting;

        // The handle's completion is registered inside the transport
        // before the wire request fires, so the outcome cannot be missed.
        let handle = self.transport.create_session(self.request.clone());

        match handle.wait().await {
            Ok(data) => {
                self.state = SessionState::Active;
                self.session_id = Some(data.session_id.clone());
                self.negotiated = Some(data.capabilities.clone());

                tracing::info!(
                    %endpoint,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    session_id = %data.session_id,
                    "session created"
                );
                tracing::info!("using: {}", data.describe());

                Ok(data)
            }
            Err(err) => {
                tracing::warn!(%endpoint, error = %err, "session creation failed");
                self.state = SessionState::Idle;
                Err(err)
            }
        }
    }

    /// Closes the active session.
    ///
    /// Resolves immediately without touching the transport when session
    /// start is disabled: there is nothing to close. Otherwise delegates
    /// to the transport and, on success, runs [`Session::finished`] with
    /// `reason` before resolving with the driver's response payload. A
    /// transport failure propagates unchanged and leaves the session in
    /// its prior state; callers wanting cleanup anyway can invoke
    /// `finished` themselves.
    pub async fn close(&mut self, reason: &str) -> Result<Value> {
        if !self.settings.start_session {
            return Ok(Value::Null);
        }

        let data = self.transport.close_session().await?;
        self.finished(reason);
        Ok(data)
    }

    /// Clears session identity and capabilities, transitions to
    /// `Finished`, and notifies lifecycle listeners. Chainable.
    pub fn finished(&mut self, reason: &str) -> &mut Self {
        self.session_id = None;
        self.negotiated = None;
        self.state = SessionState::Finished;

        tracing::debug!(%reason, "session finished");
        // No listeners is fine; the notification is best-effort.
        let _ = self.events.send(SessionEvent::Finished {
            reason: reason.to_string(),
        });

        self
    }

    /// Subscribes to lifecycle notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The driver-assigned session id while active; `None` before
    /// creation and after finish.
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Negotiated capabilities, authoritative once the session is active.
    pub fn capabilities(&self) -> Option<&Value> {
        self.negotiated.as_ref()
    }

    /// The desired capability set computed for this attempt.
    pub fn desired_capabilities(&self) -> &Capabilities {
        self.request.desired()
    }

    /// The capability request handed to the transport.
    pub fn capability_request(&self) -> &CapabilityRequest {
        &self.request
    }

    /// The owned per-session command queue.
    pub fn command_queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn command_queue_mut(&mut self) -> &mut CommandQueue {
        &mut self.queue
    }

    /// Settings this session was created with.
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn start_session_enabled(&self) -> bool {
        self.settings.start_session
    }

    pub fn end_session_on_fail(&self) -> bool {
        self.settings.end_session_on_fail
    }

    pub fn output_enabled(&self) -> bool {
        self.settings.output
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("session_id", &self.session_id)
            .field("dialect", &self.request.dialect())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;
    use serde_json::json;
    use wd_runtime::{Error, HandshakeCompleter, HandshakeHandle};

    use super::*;

    /// Transport double that resolves the handshake from a scripted
    /// outcome and counts wire interactions.
    #[derive(Default)]
    struct FakeTransport {
        create_outcome: Mutex<Option<Result<NewSessionData>>>,
        close_outcome: Mutex<Option<Result<Value>>>,
        last_request: Mutex<Option<CapabilityRequest>>,
        create_calls: AtomicUsize,
        close_calls: AtomicUsize,
    }

    impl FakeTransport {
        fn with_create(outcome: Result<NewSessionData>) -> Arc<Self> {
            let transport = Self::default();
            *transport.create_outcome.lock() = Some(outcome);
            Arc::new(transport)
        }
    }

    impl Transport for FakeTransport {
        fn create_session(&self, request: CapabilityRequest) -> HandshakeHandle {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock() = Some(request);

            let (completer, handle) = HandshakeCompleter::pair();
            match self.create_outcome.lock().take() {
                Some(Ok(data)) => completer.succeed(data),
                Some(Err(err)) => completer.fail(err),
                None => drop(completer),
            }
            handle
        }

        fn close_session(&self) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + '_>> {
            self.close_calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                self.close_outcome
                    .lock()
                    .take()
                    .unwrap_or(Ok(Value::Null))
            })
        }
    }

    fn new_session_payload() -> NewSessionData {
        NewSessionData {
            session_id: "abc123".to_string(),
            capabilities: json!({"browserName": "firefox", "version": "118.0"}),
        }
    }

    #[tokio::test]
    async fn create_stores_identity_and_becomes_active() {
        let transport = FakeTransport::with_create(Ok(new_session_payload()));
        let mut session = Session::new(SessionSettings::default(), transport.clone());
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.session_id(), None);

        let data = session.create(LaunchOptions::default()).await.unwrap();
        assert_eq!(data.session_id, "abc123");
        assert_eq!(session.session_id(), Some("abc123"));
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(
            session.capabilities().unwrap()["browserName"],
            "firefox"
        );
    }

    #[tokio::test]
    async fn create_surfaces_transport_error_and_returns_to_idle() {
        let transport = FakeTransport::with_create(Err(Error::ConnectionFailed(
            "ECONNREFUSED".to_string(),
        )));
        let mut session = Session::new(SessionSettings::default(), transport);

        let err = session.create(LaunchOptions::default()).await.unwrap_err();
        assert!(err.to_string().contains("ECONNREFUSED"));
        assert_eq!(session.session_id(), None);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.capabilities().is_none());
    }

    #[tokio::test]
    async fn create_applies_headless_before_handing_off_to_transport() {
        let transport = FakeTransport::with_create(Ok(new_session_payload()));
        let mut session = Session::new(SessionSettings::default(), transport.clone());

        session
            .create(LaunchOptions::default().headless(true))
            .await
            .unwrap();

        let request = transport.last_request.lock().clone().unwrap();
        // Default browser is firefox, so the flag lands on the moz path.
        assert_eq!(
            request.desired().get("alwaysMatch"),
            Some(&json!({"moz:firefoxOptions": {"args": ["-headless"]}}))
        );
        // The wire block reflects the post-injection desired tree.
        assert_eq!(
            request.wire().get("alwaysMatch"),
            Some(&json!({"moz:firefoxOptions": {"args": ["-headless"]}}))
        );
    }

    #[tokio::test]
    async fn create_without_injection_leaves_wire_block_alone() {
        let transport = FakeTransport::with_create(Ok(new_session_payload()));
        let mut session = Session::new(SessionSettings::default(), transport.clone());

        session.create(LaunchOptions::default()).await.unwrap();

        let request = transport.last_request.lock().clone().unwrap();
        // Default settings are firefox/legacy with an empty wire seed:
        // nothing merged the desired set into the block at compute time,
        // and with no injector firing nothing merges it at launch either.
        assert!(request.wire().is_empty());
    }

    #[tokio::test]
    async fn close_clears_state_and_notifies_listeners() {
        let transport = FakeTransport::with_create(Ok(new_session_payload()));
        *transport.close_outcome.lock() = Some(Ok(json!({"state": "success"})));
        let mut session = Session::new(SessionSettings::default(), transport.clone());
        let mut events = session.subscribe();

        session.create(LaunchOptions::default()).await.unwrap();
        let payload = session.close("test failed").await.unwrap();

        assert_eq!(payload, json!({"state": "success"}));
        assert_eq!(session.session_id(), None);
        assert!(session.capabilities().is_none());
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(
            events.recv().await.unwrap(),
            SessionEvent::Finished {
                reason: "test failed".to_string()
            }
        );
    }

    #[tokio::test]
    async fn close_with_sessions_disabled_skips_transport_and_notification() {
        let transport = Arc::new(FakeTransport::default());
        let settings = SessionSettings::default().with_start_session(false);
        let mut session = Session::new(settings, transport.clone());
        let mut events = session.subscribe();

        let payload = session.close("ignored").await.unwrap();
        assert_eq!(payload, Value::Null);
        assert_eq!(transport.close_calls.load(Ordering::SeqCst), 0);
        assert!(matches!(
            events.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn close_failure_propagates_and_leaves_state_untouched() {
        let transport = FakeTransport::with_create(Ok(new_session_payload()));
        *transport.close_outcome.lock() =
            Some(Err(Error::ConnectionFailed("socket hang up".to_string())));
        let mut session = Session::new(SessionSettings::default(), transport);

        session.create(LaunchOptions::default()).await.unwrap();
        let err = session.close("flaky").await.unwrap_err();

        assert!(matches!(err, Error::ConnectionFailed(_)));
        // finished() was not invoked; the session keeps its identity.
        assert_eq!(session.session_id(), Some("abc123"));
        assert_eq!(session.state(), SessionState::Active);
    }

    #[tokio::test]
    async fn finished_is_chainable_and_idempotent() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = Session::new(SessionSettings::default(), transport);

        let state = session.finished("first").finished("second").state();
        assert_eq!(state, SessionState::Finished);
        assert_eq!(session.session_id(), None);
    }

    #[tokio::test]
    async fn desired_capabilities_are_computed_once_at_construction() {
        let mut user = Capabilities::new();
        user.insert("browserName", json!("chrome"));
        let settings = SessionSettings::default().with_desired_capabilities(user);

        let transport = Arc::new(FakeTransport::default());
        let session = Session::new(settings, transport);

        assert_eq!(session.desired_capabilities().browser_name(), Some("chrome"));
        // Defaults not overridden by the user survive.
        assert_eq!(
            session.desired_capabilities().get("platform"),
            Some(&json!("ANY"))
        );
    }

    #[tokio::test]
    async fn queue_is_owned_and_starts_empty() {
        let transport = Arc::new(FakeTransport::default());
        let mut session = Session::new(SessionSettings::default(), transport);

        assert!(session.command_queue().is_empty());
        session.command_queue_mut().add("noop", || async { Ok(()) });
        assert_eq!(session.command_queue().len(), 1);
    }
}
