//! WebDriver transport runtime.
//!
//! This crate provides the infrastructure the session layer builds on:
//!
//! - **Handshake plumbing**: one-shot completion handles for the
//!   asynchronous session-creation handshake
//! - **Transport contract**: the trait the session layer consumes for
//!   creating and closing remote sessions
//! - **HTTP transport**: a driver-endpoint implementation over HTTP
//!
//! The handshake is deliberately not event-emitter shaped: a transport
//! hands back a single pending-completion handle with two mutually
//! exclusive resolution paths (success or error), each firing at most
//! once. The handle is registered before the wire request is triggered,
//! so no outcome can be missed in between.

pub mod error;
pub mod http;
pub mod transport;

pub use error::{Error, Result};
pub use http::{Endpoint, HttpTransport};
pub use transport::{HandshakeCompleter, HandshakeHandle, Transport};
