//! Integration tests for the syslog client lifecycle against loopback receivers

use std::time::{Duration, SystemTime};
use syslog_replay::{replay, Delivery, DeliveryError, SyslogClient, Transport};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, UdpSocket};
use tokio::time::timeout;

/// Split a received frame into its timestamp and message parts, asserting the
/// fixed fields along the way
fn parse_frame(frame: &str) -> (SystemTime, &str) {
    let rest = frame.strip_prefix("<14>1 ").expect("priority and version");
    let (timestamp, rest) = rest.split_once(' ').expect("timestamp");
    assert!(timestamp.ends_with('Z'), "timestamp must be UTC: {}", timestamp);
    let fraction = timestamp
        .rsplit_once('.')
        .map(|(_, f)| f.trim_end_matches('Z'))
        .expect("fractional seconds");
    assert_eq!(fraction.len(), 6, "microsecond precision: {}", timestamp);

    let message = rest
        .strip_prefix("PYTHON_TEST_SENDER - - - - ")
        .expect("sender and nil fields");
    let message = message.strip_suffix('\n').expect("line feed trailer");

    let time = humantime::parse_rfc3339(timestamp).expect("valid rfc3339 timestamp");
    (time, message)
}

async fn unused_tcp_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

#[tokio::test]
async fn test_udp_hello_world() {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = receiver.local_addr().unwrap().port();

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Udp);
    let before = SystemTime::now() - Duration::from_secs(1);
    let delivery = replay::send_message(&mut client, "hello world").await;
    assert!(delivery.is_sent());
    assert!(!client.is_connected());

    let mut buf = vec![0u8; 2048];
    let (len, _) = timeout(Duration::from_secs(2), receiver.recv_from(&mut buf))
        .await
        .expect("datagram within timeout")
        .unwrap();
    let frame = std::str::from_utf8(&buf[..len]).unwrap();

    let (time, message) = parse_frame(frame);
    assert_eq!(message, "hello world");
    assert!(time >= before);
}

#[tokio::test]
async fn test_tcp_delivers_exact_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = String::new();
        stream.read_to_string(&mut received).await.unwrap();
        received
    });

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Tcp);
    let delivery = client.send("user logged in: alice").await;
    assert!(delivery.is_sent());
    assert!(client.is_connected());
    client.close().await;

    let received = timeout(Duration::from_secs(2), server).await.unwrap().unwrap();
    let (_, message) = parse_frame(&received);
    assert_eq!(message, "user logged in: alice");
}

#[tokio::test]
async fn test_connect_is_idempotent() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Tcp);
    client.connect().await.unwrap();
    let (_first, _) = listener.accept().await.unwrap();
    let peer = client.peer_addr();

    client.connect().await.unwrap();
    assert!(client.is_connected());
    assert_eq!(client.peer_addr(), peer);

    // A second connect must not have opened another connection
    let second = timeout(Duration::from_millis(200), listener.accept()).await;
    assert!(second.is_err());
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = receiver.local_addr().unwrap().port();

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Udp);
    client.close().await;
    assert!(!client.is_connected());

    client.connect().await.unwrap();
    assert!(client.is_connected());
    client.close().await;
    client.close().await;
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_send_without_listener_is_dropped() {
    let port = unused_tcp_port().await;

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Tcp);
    let delivery = client.send("nobody home").await;

    assert!(!delivery.is_sent());
    assert!(delivery.error().unwrap().is_connect());
    assert!(!client.is_connected());

    // The reported cause is the last candidate's own failure
    match delivery {
        Delivery::Dropped(DeliveryError::Connect { source, .. }) => {
            assert_eq!(source.kind(), std::io::ErrorKind::ConnectionRefused);
        }
        other => panic!("expected a connect failure, got {:?}", other),
    }

    // Still usable afterwards
    let delivery = client.send("still nobody").await;
    assert!(!delivery.is_sent());
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_send_failure_resets_and_reconnects() {
    let port = {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        socket.local_addr().unwrap().port()
    };

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Udp);

    // The first datagram leaves before the port-unreachable reply comes back
    let first = client.send("first").await;
    assert!(first.is_sent());
    assert!(client.is_connected());

    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = client.send("second").await;
    assert!(!second.is_sent());
    assert!(second.error().unwrap().is_send());
    assert!(!client.is_connected());

    // Next send starts from a fresh socket
    let third = client.send("third").await;
    assert!(third.is_sent());
    assert!(client.is_connected());
    client.close().await;
}

#[tokio::test]
async fn test_unresolvable_host_is_dropped() {
    let mut client = SyslogClient::new("does-not-exist.invalid", 514, Transport::Udp);
    let delivery = client.send("lost").await;

    assert!(!delivery.is_sent());
    assert!(delivery.error().unwrap().is_resolution());
    assert!(!client.is_connected());
}

#[tokio::test]
async fn test_pre_terminated_message_keeps_both_newlines() {
    let receiver = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = receiver.local_addr().unwrap().port();

    let mut client = SyslogClient::new("127.0.0.1", port, Transport::Udp);
    assert!(client.send("row,1\n").await.is_sent());

    let mut buf = vec![0u8; 2048];
    let (len, _) = timeout(Duration::from_secs(2), receiver.recv_from(&mut buf))
        .await
        .unwrap()
        .unwrap();
    let frame = std::str::from_utf8(&buf[..len]).unwrap();
    assert!(frame.ends_with("- - - - row,1\n\n"));
}

#[tokio::test]
async fn test_local_hostname_captured() {
    let client = SyslogClient::new("localhost", 514, Transport::Tcp);
    assert!(!client.local_hostname().is_empty());
    assert!(!client.is_connected());
    assert_eq!(client.transport(), Transport::Tcp);
}
