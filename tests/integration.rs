//! Integration tests for udp2docker.
//!
//! Each test runs a real server on an ephemeral localhost port and talks
//! to it through a plain UDP socket, the way an actual peer would.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;

use udp2docker::protocol::{Header, Message, MessageBuilder, MessageType, SequenceCounter};
use udp2docker::stats::SessionStats;
use udp2docker::{Server, ServerConfig, ShutdownHandle};

const REPLY_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(300);

struct TestServer {
    addr: SocketAddr,
    stats: Arc<SessionStats>,
    shutdown: ShutdownHandle,
    handle: tokio::task::JoinHandle<udp2docker::Result<()>>,
}

impl TestServer {
    async fn start() -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            stats_interval: Duration::from_secs(60),
        };
        let server = Server::bind(&config).await.unwrap();
        let addr = server.local_addr().unwrap();
        let stats = server.stats();
        let shutdown = server.shutdown_handle();
        let handle = tokio::spawn(server.run());
        Self {
            addr,
            stats,
            shutdown,
            handle,
        }
    }

    async fn stop(self) {
        self.shutdown.shutdown();
        timeout(REPLY_TIMEOUT, self.handle)
            .await
            .expect("server should stop promptly")
            .unwrap()
            .unwrap();
    }

    /// Wait until the server has counted `n` received datagrams.
    async fn wait_for_messages(&self, n: u64) {
        timeout(REPLY_TIMEOUT, async {
            while self.stats.messages_received() < n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("server should have processed the datagrams");
    }
}

async fn client() -> UdpSocket {
    UdpSocket::bind("127.0.0.1:0").await.unwrap()
}

async fn recv_text(socket: &UdpSocket) -> String {
    let mut buf = vec![0u8; 65536];
    let (len, _) = timeout(REPLY_TIMEOUT, socket.recv_from(&mut buf))
        .await
        .expect("expected a reply")
        .unwrap();
    String::from_utf8(buf[..len].to_vec()).unwrap()
}

async fn assert_silent(socket: &UdpSocket) {
    let mut buf = vec![0u8; 65536];
    let result = timeout(SILENCE_WINDOW, socket.recv_from(&mut buf)).await;
    assert!(result.is_err(), "expected no reply, got one");
}

#[tokio::test]
async fn heartbeat_is_acknowledged() {
    let server = TestServer::start().await;
    let socket = client().await;

    let datagram = Message::heartbeat().encode().unwrap();
    socket.send_to(&datagram, server.addr).await.unwrap();

    assert_eq!(recv_text(&socket).await, "heartbeat_ack");
    server.stop().await;
}

#[tokio::test]
async fn data_message_is_acknowledged() {
    let server = TestServer::start().await;
    let socket = client().await;

    let seq = SequenceCounter::new();
    let datagram = Message::data(b"temperature=20.1".to_vec())
        .with_sequence_id(seq.next())
        .encode()
        .unwrap();
    socket.send_to(&datagram, server.addr).await.unwrap();

    assert_eq!(recv_text(&socket).await, "data_received");
    server.stop().await;
}

#[tokio::test]
async fn docker_control_command_gets_simulated_success() {
    let server = TestServer::start().await;
    let socket = client().await;

    let datagram = Message::control("docker ps").encode().unwrap();
    socket.send_to(&datagram, server.addr).await.unwrap();

    let reply = recv_text(&socket).await;
    assert!(reply.contains("Simulated execution: docker ps"));
    assert!(reply.contains("status: success"));
    assert!(reply.contains("time: "));
    server.stop().await;
}

#[tokio::test]
async fn non_docker_control_command_is_unknown() {
    let server = TestServer::start().await;
    let socket = client().await;

    let datagram = Message::control("restart").encode().unwrap();
    socket.send_to(&datagram, server.addr).await.unwrap();

    assert_eq!(recv_text(&socket).await, "Unknown command: restart");
    server.stop().await;
}

#[tokio::test]
async fn response_messages_are_never_answered() {
    let server = TestServer::start().await;
    let socket = client().await;

    let datagram = MessageBuilder::new()
        .msg_type(MessageType::Response)
        .payload_str("ack from the other instance")
        .build()
        .encode()
        .unwrap();
    socket.send_to(&datagram, server.addr).await.unwrap();

    server.wait_for_messages(1).await;
    assert_silent(&socket).await;
    server.stop().await;
}

#[tokio::test]
async fn truncated_payload_is_dropped_without_reply() {
    let server = TestServer::start().await;
    let socket = client().await;

    // Header declares a payload longer than what actually follows.
    let mut datagram = Message::data(b"abc".to_vec()).encode().unwrap();
    datagram[20..24].copy_from_slice(&500u32.to_le_bytes());
    socket.send_to(&datagram, server.addr).await.unwrap();

    server.wait_for_messages(1).await;
    assert_silent(&socket).await;
    assert_eq!(server.stats.errors(), 0);
    server.stop().await;
}

#[tokio::test]
async fn unframed_text_gets_preview_reply() {
    let server = TestServer::start().await;
    let socket = client().await;

    socket.send_to(b"hello", server.addr).await.unwrap();

    assert_eq!(recv_text(&socket).await, "Received message: hello...");
    server.stop().await;
}

#[tokio::test]
async fn unframed_json_gets_same_reply_shape() {
    let server = TestServer::start().await;
    let socket = client().await;

    let json = r#"{"action":"status","id":17}"#;
    socket.send_to(json.as_bytes(), server.addr).await.unwrap();

    assert_eq!(
        recv_text(&socket).await,
        format!("Received message: {}...", json)
    );
    server.stop().await;
}

#[tokio::test]
async fn unframed_binary_is_counted_but_silent() {
    let server = TestServer::start().await;
    let socket = client().await;

    let junk = [0xFFu8, 0x00, 0x80, 0xFE, 0x01];
    socket.send_to(&junk, server.addr).await.unwrap();

    server.wait_for_messages(1).await;
    assert_silent(&socket).await;
    assert_eq!(server.stats.messages_received(), 1);
    assert_eq!(server.stats.bytes_received(), junk.len() as u64);
    assert_eq!(server.stats.errors(), 0);
    server.stop().await;
}

#[tokio::test]
async fn counters_accumulate_across_mixed_traffic() {
    let server = TestServer::start().await;
    let socket = client().await;

    let heartbeat = Message::heartbeat().encode().unwrap();
    let text = b"status?".to_vec();
    let junk = vec![0xFFu8; 48];

    socket.send_to(&heartbeat, server.addr).await.unwrap();
    socket.send_to(&text, server.addr).await.unwrap();
    socket.send_to(&junk, server.addr).await.unwrap();

    server.wait_for_messages(3).await;
    let expected = (heartbeat.len() + text.len() + junk.len()) as u64;
    assert_eq!(server.stats.messages_received(), 3);
    assert_eq!(server.stats.bytes_received(), expected);

    // Drain the two replies so nothing lingers.
    recv_text(&socket).await;
    recv_text(&socket).await;
    server.stop().await;
}

#[tokio::test]
async fn malformed_header_falls_back_to_unframed() {
    let server = TestServer::start().await;
    let socket = client().await;

    // 40 bytes of text: long enough for a header, wrong magic.
    let text = "x".repeat(40);
    socket.send_to(text.as_bytes(), server.addr).await.unwrap();

    let reply = recv_text(&socket).await;
    assert_eq!(reply, format!("Received message: {}...", text));
    server.stop().await;
}

#[tokio::test]
async fn server_survives_malformed_then_serves_valid() {
    let server = TestServer::start().await;
    let socket = client().await;

    // Garbage first, then a valid heartbeat on the same socket.
    socket.send_to(&[0xFFu8; 3], server.addr).await.unwrap();
    server.wait_for_messages(1).await;

    let datagram = Message::heartbeat().encode().unwrap();
    socket.send_to(&datagram, server.addr).await.unwrap();
    assert_eq!(recv_text(&socket).await, "heartbeat_ack");
    server.stop().await;
}

#[tokio::test]
async fn encoded_message_round_trips_through_header_codec() {
    let seq = SequenceCounter::new();
    let message = Message::control("docker logs app").with_sequence_id(seq.next());
    let datagram = message.encode().unwrap();

    let header = Header::decode(&datagram).unwrap();
    assert_eq!(header.message_type(), MessageType::Control);
    assert_eq!(header.sequence_id, 1);
    assert_eq!(header.payload_size as usize, "docker logs app".len());
    assert_eq!(
        &datagram[32..32 + header.payload_size as usize],
        b"docker logs app"
    );
}
