//! Payloads consumed from the driver's responses.
//!
//! Only the fields the session layer actually reads are modeled;
//! everything else rides along inside the raw capability `Value`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The payload of a successful session-creation handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionData {
    /// Opaque session identifier assigned by the driver.
    #[serde(rename = "sessionId")]
    pub session_id: String,
    /// Negotiated capabilities, authoritative for the session's lifetime.
    #[serde(default)]
    pub capabilities: Value,
}

impl NewSessionData {
    /// Renders a one-line description of the negotiated browser/platform.
    ///
    /// Reads diagnostic fields opportunistically: the legacy and W3C
    /// dialects spell them differently (`platform` vs `platformName`,
    /// `version` vs `browserVersion`), and a driver may omit any of them.
    pub fn describe(&self) -> String {
        let caps = &self.capabilities;

        let browser = str_field(caps, &["browserName"]).unwrap_or("unknown");
        let version = str_field(caps, &["version", "browserVersion"]).unwrap_or("unknown");
        let platform = str_field(caps, &["platform", "platformName"]).unwrap_or("unknown");

        match str_field(caps, &["platformVersion"]) {
            Some(platform_version) => {
                format!("{browser} ({version}) on {platform} {platform_version}")
            }
            None => format!("{browser} ({version}) on {platform}"),
        }
    }
}

/// Returns the first present string field among `names`.
fn str_field<'a>(caps: &'a Value, names: &[&str]) -> Option<&'a str> {
    names.iter().find_map(|name| caps.get(name)?.as_str())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_session_id_and_capabilities() {
        let data: NewSessionData = serde_json::from_value(json!({
            "sessionId": "abc123",
            "capabilities": {"browserName": "chrome"},
        }))
        .unwrap();

        assert_eq!(data.session_id, "abc123");
        assert_eq!(data.capabilities["browserName"], "chrome");
    }

    #[test]
    fn missing_capabilities_defaults_to_null() {
        let data: NewSessionData =
            serde_json::from_value(json!({"sessionId": "abc123"})).unwrap();
        assert!(data.capabilities.is_null());
    }

    #[test]
    fn describe_reads_legacy_field_names() {
        let data = NewSessionData {
            session_id: "s".into(),
            capabilities: json!({
                "browserName": "firefox",
                "version": "118.0",
                "platform": "LINUX",
            }),
        };
        assert_eq!(data.describe(), "firefox (118.0) on LINUX");
    }

    #[test]
    fn describe_reads_w3c_field_names_with_platform_version() {
        let data = NewSessionData {
            session_id: "s".into(),
            capabilities: json!({
                "browserName": "chrome",
                "browserVersion": "120.0",
                "platformName": "mac",
                "platformVersion": "14.2",
            }),
        };
        assert_eq!(data.describe(), "chrome (120.0) on mac 14.2");
    }

    #[test]
    fn describe_tolerates_absent_fields() {
        let data = NewSessionData {
            session_id: "s".into(),
            capabilities: json!({}),
        };
        assert_eq!(data.describe(), "unknown (unknown) on unknown");
    }
}
