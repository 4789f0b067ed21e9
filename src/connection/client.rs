//! Syslog Client Implementation

use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};

use tokio::io::AsyncWriteExt;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tracing::{debug, warn};

use super::error::DeliveryError;
use crate::config::{SenderConfig, Transport};
use crate::protocol::SyslogFrame;

/// Result of a single [`SyslogClient::send`]
#[derive(Debug)]
pub enum Delivery {
    /// The whole frame was handed to the socket
    Sent { bytes: usize },
    /// The frame was dropped and the client is disconnected
    Dropped(DeliveryError),
}

impl Delivery {
    pub fn is_sent(&self) -> bool {
        matches!(self, Delivery::Sent { .. })
    }

    pub fn error(&self) -> Option<&DeliveryError> {
        match self {
            Delivery::Sent { .. } => None,
            Delivery::Dropped(e) => Some(e),
        }
    }
}

/// Live socket owned by a client
#[derive(Debug)]
enum SyslogSocket {
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl SyslogSocket {
    async fn open(transport: Transport, addr: SocketAddr) -> io::Result<Self> {
        match transport {
            Transport::Tcp => Ok(SyslogSocket::Tcp(TcpStream::connect(addr).await?)),
            Transport::Udp => {
                let local: SocketAddr = if addr.is_ipv4() {
                    (Ipv4Addr::UNSPECIFIED, 0).into()
                } else {
                    (Ipv6Addr::UNSPECIFIED, 0).into()
                };
                let socket = UdpSocket::bind(local).await?;
                socket.connect(addr).await?;
                Ok(SyslogSocket::Udp(socket))
            }
        }
    }

    async fn write_frame(&mut self, payload: &[u8]) -> io::Result<()> {
        match self {
            SyslogSocket::Tcp(stream) => stream.write_all(payload).await,
            SyslogSocket::Udp(socket) => {
                let written = socket.send(payload).await?;
                if written != payload.len() {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("datagram truncated: {} of {} bytes", written, payload.len()),
                    ));
                }
                Ok(())
            }
        }
    }

    fn peer_addr(&self) -> io::Result<SocketAddr> {
        match self {
            SyslogSocket::Tcp(stream) => stream.peer_addr(),
            SyslogSocket::Udp(socket) => socket.peer_addr(),
        }
    }
}

/// Best-effort syslog sender bound to one destination.
///
/// Holds at most one connected socket. The socket is opened lazily by
/// [`send`](Self::send) and discarded on any failure, so the next send starts
/// from a fresh connection attempt.
#[derive(Debug)]
pub struct SyslogClient {
    host: String,
    port: u16,
    transport: Transport,
    local_hostname: String,
    socket: Option<SyslogSocket>,
}

impl SyslogClient {
    /// Create a disconnected client
    pub fn new(host: impl Into<String>, port: u16, transport: Transport) -> Self {
        let local_hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .unwrap_or_else(|| "localhost".to_string());

        Self {
            host: host.into(),
            port,
            transport,
            local_hostname,
            socket: None,
        }
    }

    pub fn from_config(config: &SenderConfig) -> Self {
        Self::new(config.server.clone(), config.port, config.transport)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    /// Hostname of this machine, looked up once at construction
    pub fn local_hostname(&self) -> &str {
        &self.local_hostname
    }

    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Address of the connected receiver, if any
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|s| s.peer_addr().ok())
    }

    fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connect to the first reachable resolved address.
    ///
    /// Does nothing when already connected. Candidates are tried in resolver
    /// order; a failed candidate's socket is dropped before the next one is
    /// tried.
    pub async fn connect(&mut self) -> Result<(), DeliveryError> {
        if self.socket.is_some() {
            return Ok(());
        }

        let target = self.target();
        let candidates: Vec<SocketAddr> = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|source| DeliveryError::Resolution {
                target: target.clone(),
                source,
            })?
            .collect();

        if candidates.is_empty() {
            return Err(DeliveryError::Resolution {
                target,
                source: io::Error::new(io::ErrorKind::NotFound, "no addresses returned"),
            });
        }

        // candidates is non-empty, so this is always replaced by a real attempt
        let mut last_error = io::Error::from(io::ErrorKind::NotConnected);
        for addr in candidates {
            match SyslogSocket::open(self.transport, addr).await {
                Ok(socket) => {
                    debug!("Connected to {} ({}) over {}", target, addr, self.transport);
                    self.socket = Some(socket);
                    return Ok(());
                }
                Err(e) => {
                    debug!("Connection attempt to {} failed: {}", addr, e);
                    last_error = e;
                }
            }
        }

        Err(DeliveryError::Connect {
            target,
            transport: self.transport,
            source: last_error,
        })
    }

    /// Frame `message` and send it, connecting first if needed.
    ///
    /// Never fails: a message that cannot be delivered is dropped, the socket
    /// is closed, and the reason is returned for callers that care.
    pub async fn send(&mut self, message: &str) -> Delivery {
        if let Err(e) = self.connect().await {
            warn!("Dropping message: {}", e);
            return Delivery::Dropped(e);
        }

        let payload = SyslogFrame::new(message).encode();
        let result = match self.socket.as_mut() {
            Some(socket) => socket.write_frame(&payload).await,
            None => Err(io::Error::from(io::ErrorKind::NotConnected)),
        };

        match result {
            Ok(()) => {
                debug!("Sent {} bytes to {}", payload.len(), self.target());
                Delivery::Sent { bytes: payload.len() }
            }
            Err(source) => {
                self.close().await;
                let e = DeliveryError::Send {
                    target: self.target(),
                    source,
                };
                warn!("Dropping message: {}", e);
                Delivery::Dropped(e)
            }
        }
    }

    /// Close the socket if one is open
    pub async fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            if let SyslogSocket::Tcp(mut stream) = socket {
                if let Err(e) = stream.shutdown().await {
                    debug!("Error shutting down connection to {}: {}", self.target(), e);
                }
            }
            debug!("Closed connection to {}", self.target());
        }
    }
}
