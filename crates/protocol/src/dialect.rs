//! Wire-protocol dialect detection.

use serde_json::Value;

use crate::capabilities::{BrowserFamily, Capabilities};

/// Which wire-protocol variant governs how capabilities are framed in the
/// session-creation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolDialect {
    /// The legacy JSON wire protocol (`desiredCapabilities` framing).
    Legacy,
    /// The W3C WebDriver protocol (`capabilities` framing).
    W3C,
}

impl ProtocolDialect {
    /// Detects the dialect from a desired capability set.
    ///
    /// Pure function, consulted exactly once at capability-setup time.
    /// Chrome opts into W3C through the nested `chromeOptions.w3c` flag
    /// (absent means false); every other browser is legacy unless the
    /// driver negotiates otherwise during the handshake.
    pub fn detect(caps: &Capabilities) -> Self {
        if BrowserFamily::from_capabilities(caps) != BrowserFamily::Chrome {
            return Self::Legacy;
        }

        let w3c = caps
            .get("chromeOptions")
            .and_then(|opts| opts.get("w3c"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        if w3c { Self::W3C } else { Self::Legacy }
    }
}

impl std::fmt::Display for ProtocolDialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::W3C => write!(f, "w3c"),
        }
    }
}
