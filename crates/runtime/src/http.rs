//! HTTP transport against a driver endpoint.
//!
//! Frames the new-session request per the dialect in effect, parses the
//! driver's response in either wire shape, and remembers the active
//! session id so close can address `DELETE /session/{id}`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Value, json};
use wd_protocol::{CapabilityRequest, NewSessionData, ProtocolDialect};

use crate::error::{Error, Result};
use crate::transport::{HandshakeCompleter, HandshakeHandle, Transport};

/// A driver endpoint address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Base URL for wire requests.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// HTTP-based [`Transport`] implementation.
pub struct HttpTransport {
    endpoint: Endpoint,
    client: reqwest::Client,
    /// Session id of the currently active session, if any.
    active: Arc<Mutex<Option<String>>>,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
            active: Arc::new(Mutex::new(None)),
        }
    }

    /// The endpoint this transport talks to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Session id currently tracked as active, if any.
    pub fn active_session(&self) -> Option<String> {
        self.active.lock().clone()
    }
}

impl Transport for HttpTransport {
    fn create_session(&self, request: CapabilityRequest) -> HandshakeHandle {
        // The completion pair exists before the request task is spawned,
        // so the outcome cannot race past its listener.
        let (completer, handle) = HandshakeCompleter::pair();

        let client = self.client.clone();
        let url = format!("{}/session", self.endpoint.base_url());
        let body = new_session_body(&request);
        let active = Arc::clone(&self.active);

        tracing::debug!(%url, dialect = %request.dialect(), "sending new-session request");

        tokio::spawn(async move {
            match send_new_session(&client, &url, body).await {
                Ok(data) => {
                    tracing::debug!(session_id = %data.session_id, "session created");
                    *active.lock() = Some(data.session_id.clone());
                    completer.succeed(data);
                }
                Err(err) => {
                    tracing::debug!(error = %err, "new-session request failed");
                    completer.fail(err);
                }
            }
        });

        handle
    }

    fn close_session(&self) -> Pin<Box<dyn Future<Output = Result<Value>> + Send + '_>> {
        Box::pin(async move {
            let session_id = self.active.lock().clone().ok_or(Error::NoActiveSession)?;
            let url = format!("{}/session/{}", self.endpoint.base_url(), session_id);

            tracing::debug!(%url, "closing session");
            let response = self.client.delete(&url).send().await?;
            let body = parse_close_body(&response.text().await?)?;

            *self.active.lock() = None;
            Ok(body)
        })
    }
}

/// Parses a close-session response body.
///
/// Drivers commonly answer a delete with an empty body; that resolves
/// to `Null`. A body that is present but not JSON is an error.
fn parse_close_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

async fn send_new_session(client: &reqwest::Client, url: &str, body: Value) -> Result<NewSessionData> {
    let response = client.post(url).json(&body).send().await?;
    let payload = response.json::<Value>().await?;
    parse_new_session(&payload)
}

/// Frames the new-session body for the dialect in effect.
///
/// Legacy drivers read `desiredCapabilities`; W3C drivers read the
/// `capabilities` block, which carries the request's owned wire block.
/// The desired set is sent in both cases so mixed-mode drivers can pick
/// either.
fn new_session_body(request: &CapabilityRequest) -> Value {
    match request.dialect() {
        ProtocolDialect::Legacy => json!({
            "desiredCapabilities": request.desired(),
        }),
        ProtocolDialect::W3C => json!({
            "desiredCapabilities": request.desired(),
            "capabilities": request.wire(),
        }),
    }
}

/// Parses a new-session response in either wire shape.
///
/// W3C nests the payload under `value`; the legacy protocol puts
/// `sessionId` at the top level with the capabilities as `value`.
/// Driver-reported errors arrive as `value.error`/`value.message`.
fn parse_new_session(payload: &Value) -> Result<NewSessionData> {
    if let Some(name) = payload["value"]["error"].as_str() {
        return Err(Error::Driver {
            name: name.to_string(),
            message: payload["value"]["message"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
        });
    }

    if payload["value"]["sessionId"].is_string() {
        return Ok(serde_json::from_value(payload["value"].clone())?);
    }

    if let Some(session_id) = payload["sessionId"].as_str() {
        return Ok(NewSessionData {
            session_id: session_id.to_string(),
            capabilities: payload["value"].clone(),
        });
    }

    Err(Error::ProtocolError(
        "new-session response carries no sessionId".to_string(),
    ))
}
