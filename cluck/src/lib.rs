//! # Cluck
//!
//! Multi-client text messaging over a small length-prefixed binary protocol.
//!
//! Every frame is a 4-byte header (big-endian `code` and payload `length`)
//! followed by `length` bytes of payload. Clients register a username on their
//! connection, ask who they are, and fetch a message of the day; the server
//! answers every request with exactly one frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cluck::prelude::*;
//!
//! let (mut server, handle) = ServerBuilder::new()
//!     .bind("0.0.0.0:9000".parse().unwrap())
//!     .build();
//!
//! server.run().await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Frame header, message codes, encode/decode
//! - [`transport`] - TCP transport and stream framing
//! - [`server`] - Sessions, registry, dispatcher and the server loop
//! - [`client`] - Request/reply client session

pub mod prelude;

/// Frame header, message codes and the codec.
pub mod core {
    pub use cluck_core::*;
}

/// Network transports.
pub mod transport {
    pub use cluck_transport::*;
}

/// Server-side engine.
pub mod server {
    pub use cluck_server::*;
}

/// Client-side engine.
pub mod client {
    pub use cluck_client::*;
}
