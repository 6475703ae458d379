//! # Switchboard Core
//!
//! The platform-facing model the Switchboard router is written against.
//!
//! The router never talks to a chat platform directly. Instead, a host
//! application translates its platform's events into [`InboundMessage`]s and
//! exposes the few outbound operations the router needs through the
//! [`Session`] trait:
//!
//! ```text
//! ┌──────────────┐  InboundMessage   ┌──────────┐
//! │ Host client  │──────────────────▶│  Router  │
//! │ (Discord,..) │◀──────────────────│          │
//! └──────────────┘  Session calls    └──────────┘
//! ```
//!
//! Keeping this layer free of any platform SDK lets the router be tested
//! against an in-memory session.

pub mod error;
pub mod message;
pub mod session;

pub use error::{PlatformError, PlatformResult};
pub use message::{InboundMessage, MessageKind};
pub use session::{BoxedSession, Session};
