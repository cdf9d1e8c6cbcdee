//! Session configuration surface.

use serde::{Deserialize, Serialize};
use wd_protocol::Capabilities;
use wd_runtime::Endpoint;

/// Fully owned configuration consumed by a [`crate::Session`].
///
/// This is the stable handoff between process-wide settings loading and
/// the session internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Whether session creation is administratively enabled. The session
    /// does not gate `create` on this flag itself; callers check it.
    pub start_session: bool,
    /// Whether error-handling collaborators should end the session on a
    /// failed command. Consulted externally, not by the session.
    pub end_session_on_fail: bool,
    /// Whether connect/using diagnostics are printed.
    pub output: bool,
    /// Driver endpoint, used for diagnostics alongside the transport.
    pub webdriver_host: String,
    /// Driver endpoint port.
    pub webdriver_port: u16,
    /// User capability overrides applied onto the defaults.
    pub desired_capabilities: Capabilities,
    /// Pre-existing wire capability block seeding the W3C `capabilities`
    /// framing.
    pub capabilities: Capabilities,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            start_session: true,
            end_session_on_fail: true,
            output: true,
            webdriver_host: "localhost".to_string(),
            webdriver_port: 4444,
            desired_capabilities: Capabilities::new(),
            capabilities: Capabilities::new(),
        }
    }
}

impl SessionSettings {
    /// Creates settings with defaults for the given endpoint.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            webdriver_host: host.into(),
            webdriver_port: port,
            ..Self::default()
        }
    }

    /// Sets the user capability overrides.
    pub fn with_desired_capabilities(mut self, caps: Capabilities) -> Self {
        self.desired_capabilities = caps;
        self
    }

    /// Enables or disables session start.
    pub fn with_start_session(mut self, enabled: bool) -> Self {
        self.start_session = enabled;
        self
    }

    /// Enables or disables diagnostic output.
    pub fn with_output(mut self, enabled: bool) -> Self {
        self.output = enabled;
        self
    }

    /// The webdriver endpoint as a typed address.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.webdriver_host.clone(), self.webdriver_port)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_enable_sessions_against_localhost() {
        let settings = SessionSettings::default();
        assert!(settings.start_session);
        assert!(settings.end_session_on_fail);
        assert_eq!(settings.endpoint().to_string(), "localhost:4444");
    }

    #[test]
    fn settings_deserialize_from_partial_json() {
        let settings: SessionSettings = serde_json::from_value(json!({
            "start_session": false,
            "desired_capabilities": {"browserName": "chrome"},
        }))
        .unwrap();

        assert!(!settings.start_session);
        assert_eq!(settings.desired_capabilities.browser_name(), Some("chrome"));
        // Unlisted fields fall back to defaults.
        assert_eq!(settings.webdriver_port, 4444);
    }
}
