//! WebDriver session lifecycle and capability negotiation.
//!
//! The [`Session`] aggregate owns the lifecycle of a single remote
//! automation session against a driver endpoint: it computes the desired
//! capability set, runs the asynchronous session-creation handshake over a
//! shared transport, tracks the negotiated identity while the session is
//! active, and tears everything down on close.
//!
//! ```text
//! Settings ─▶ Capability Model ─▶ Headless Injector ─▶ Dialect framing
//!     │                                                      │
//!     └──────────────▶ Session ◀── transport handshake ◀─────┘
//!                        │
//!                        ├─▶ command queue (owned, per session)
//!                        └─▶ lifecycle notifications (broadcast)
//! ```
//!
//! Transport implementations live in `wd-runtime`; capability data types
//! live in `wd-protocol`.

pub mod queue;
pub mod session;
pub mod settings;

pub use queue::CommandQueue;
pub use session::{LaunchOptions, Session, SessionEvent, SessionState};
pub use settings::SessionSettings;

pub use wd_protocol::{BrowserFamily, Capabilities, CapabilityRequest, ProtocolDialect};
pub use wd_runtime::{Endpoint, Error, HttpTransport, Result, Transport};
