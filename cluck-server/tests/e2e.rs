//! End-to-end tests over loopback TCP.

use bytes::Bytes;
use cluck_client::{ClientError, ClientSession};
use cluck_core::{Message, MessageCode};
use cluck_server::{InMemoryDirectory, ServerBuilder, ServerEvent, ServerHandle, SessionState};
use std::net::SocketAddr;
use std::sync::Arc;

async fn start() -> (ServerHandle, SocketAddr) {
    let (mut server, mut handle) = ServerBuilder::new()
        .bind("127.0.0.1:0".parse().unwrap())
        .build();
    tokio::spawn(async move { server.run().await });

    match handle.next_event().await {
        Some(ServerEvent::Listening(addr)) => (handle, addr),
        other => panic!("expected Listening, got {:?}", other),
    }
}

async fn connect(addr: SocketAddr) -> ClientSession {
    ClientSession::connect(&addr.to_string()).await.unwrap()
}

#[tokio::test]
async fn test_register_then_whoami() {
    let (handle, addr) = start().await;
    let mut client = connect(addr).await;

    let reply = client
        .request(&Message::text(MessageCode::RegisterUser, "Zed").unwrap())
        .await
        .unwrap();
    assert_eq!(
        reply.encode().as_ref(),
        b"\x00\x0a\x00\x25register_user_success: Zed confirmed."
    );

    let reply = client
        .request(&Message::empty(MessageCode::Whoami))
        .await
        .unwrap();
    assert_eq!(reply.encode().as_ref(), b"\x00\x65\x00\x03Zed");

    handle.shutdown();
}

#[tokio::test]
async fn test_whoami_before_register() {
    let (handle, addr) = start().await;
    let mut client = connect(addr).await;

    assert_eq!(client.whoami().await.unwrap(), None);

    client.register_user("Bob").await.unwrap();
    assert_eq!(client.whoami().await.unwrap().as_deref(), Some("Bob"));

    handle.shutdown();
}

#[tokio::test]
async fn test_usernames_are_per_connection() {
    let (handle, addr) = start().await;
    let mut alice = connect(addr).await;
    let mut other = connect(addr).await;

    alice.register_user("Alice").await.unwrap();
    assert_eq!(other.whoami().await.unwrap(), None);
    assert_eq!(alice.whoami().await.unwrap().as_deref(), Some("Alice"));

    handle.shutdown();
}

#[tokio::test]
async fn test_register_rejected() {
    let (handle, addr) = start().await;
    let mut client = connect(addr).await;

    let err = client.register_user("ab cd").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Rejected(reason)
            if reason == "register_user_error: user names cannot contain whitespace."
    ));
    assert_eq!(client.whoami().await.unwrap(), None);

    handle.shutdown();
}

#[tokio::test]
async fn test_unknown_code_keeps_connection_open() {
    let (handle, addr) = start().await;
    let mut client = connect(addr).await;

    let reply = client.request(&Message::empty(9999u16)).await.unwrap();
    assert_eq!(reply.known_code(), Some(MessageCode::CommandError));
    assert_eq!(
        reply.data_ascii().unwrap(),
        "malformed_packet_error: bad message code (9999)"
    );

    let banner = client.motd().await.unwrap();
    assert!(!banner.is_empty());

    handle.shutdown();
}

#[tokio::test]
async fn test_short_packet() {
    let (handle, addr) = start().await;
    let mut client = connect(addr).await;

    client
        .send_raw(Bytes::from_static(b"\x00\x6e\x00"))
        .await
        .unwrap();
    let reply = client.recv().await.unwrap();
    assert_eq!(reply.known_code(), Some(MessageCode::CommandError));
    assert_eq!(
        reply.data_ascii().unwrap(),
        "malformed_packet_error: incomplete header, [00, 6e, 00]"
    );

    assert_eq!(client.whoami().await.unwrap(), None);

    handle.shutdown();
}

#[tokio::test]
async fn test_custom_banner_and_directory() {
    let directory = Arc::new(InMemoryDirectory::new());
    let (mut server, mut handle) = ServerBuilder::new()
        .bind("127.0.0.1:0".parse().unwrap())
        .banner(cluck_server::StaticBanner::new("welcome to the coop"))
        .directory(Arc::clone(&directory))
        .build();
    tokio::spawn(async move { server.run().await });
    let Some(ServerEvent::Listening(addr)) = handle.next_event().await else {
        panic!("expected Listening");
    };

    let mut client = connect(addr).await;
    assert_eq!(client.motd().await.unwrap(), "welcome to the coop");
    client.register_user("Henrietta").await.unwrap();
    assert!(directory.contains("Henrietta"));

    handle.shutdown();
}

#[tokio::test]
async fn test_broadcast_to_ready_sessions() {
    let (mut server, mut handle) = ServerBuilder::new()
        .bind("127.0.0.1:0".parse().unwrap())
        .build();
    let registry = Arc::clone(server.registry());
    tokio::spawn(async move { server.run().await });
    let Some(ServerEvent::Listening(addr)) = handle.next_event().await else {
        panic!("expected Listening");
    };

    let mut listener = connect(addr).await;
    let Some(ServerEvent::SessionCreated(id, _)) = handle.next_event().await else {
        panic!("expected SessionCreated");
    };
    registry.get(id).unwrap().set_state(SessionState::Ready);

    let announcement = Message::text(MessageCode::Motd, "coop closes at dusk").unwrap();
    handle.broadcast(announcement.encode());

    assert_eq!(listener.recv().await.unwrap(), announcement);

    handle.shutdown();
}
