//! TCP transport module.
//!
//! Provides TCP client and server connections for Cluck frames.

pub mod client;
pub mod framing;
pub mod server;

pub use client::{TcpClient, TcpClientConfig};
pub use framing::CluckFrameCodec;
pub use server::{TcpConnection, TcpServer, TcpServerConfig};
