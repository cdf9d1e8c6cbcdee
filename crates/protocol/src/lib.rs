//! Wire-level capability types for the WebDriver session protocol.
//!
//! This crate models the data that crosses the session-creation handshake:
//!
//! - **Capabilities**: the capability tree the client requests from the
//!   driver, with the merge rules that produce it
//! - **Dialect**: which wire-protocol variant (legacy vs. W3C) frames the
//!   handshake request
//! - **Headless injection**: browser-specific launch-argument mutation
//! - **Remote payloads**: the fields consumed from the driver's response
//!
//! Everything here is plain data over `serde_json::Value`; no I/O happens
//! in this crate.

pub mod capabilities;
pub mod dialect;
pub mod headless;
pub mod remote;

pub use capabilities::{BrowserFamily, Capabilities, CapabilityRequest, deep_merge};
pub use dialect::ProtocolDialect;
pub use headless::apply_headless;
pub use remote::NewSessionData;
