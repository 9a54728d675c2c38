//! Prelude module for convenient imports.
//!
//! ```ignore
//! use cluck::prelude::*;
//! ```

pub use cluck_core::{
    DecodeError, EncodeError, FrameHeader, MAX_PAYLOAD_LEN, Message, MessageCode, decode, encode,
};

pub use cluck_transport::TransportError;
pub use cluck_transport::tcp::{CluckFrameCodec, TcpClient, TcpClientConfig, TcpServerConfig};

pub use cluck_server::{
    BannerSource, InMemoryDirectory, MessageDispatcher, MessageHandler, Registry, Responder,
    Server, ServerBuilder, ServerError, ServerEvent, ServerHandle, Session, SessionState,
    StaticBanner, UserDirectory, UsernameError,
};

pub use cluck_client::{ClientError, ClientSession};
