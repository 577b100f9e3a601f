use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

/// Liveness check for a local TCP service.
pub trait PortProbe: Send + Sync {
    fn name(&self) -> &str;

    /// `true` only if a connection was established within `timeout`.
    fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool;
}

/// Connects with a bounded timeout; an unreachable port is a definite `false`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpPortProbe;

impl PortProbe for TcpPortProbe {
    fn name(&self) -> &str {
        "tcp"
    }

    /// IP literals skip the resolver. Hostnames go through the system
    /// resolver first, which has no timeout of its own.
    fn is_open(&self, host: &str, port: u16, timeout: Duration) -> bool {
        let Ok(addrs) = (host, port).to_socket_addrs() else {
            tracing::debug!(host, port, "probe target did not resolve");
            return false;
        };
        connect_within(addrs, timeout)
    }
}

/// Try each address in turn against one shared deadline, so a host with
/// several addresses still finishes within `timeout`.
fn connect_within(addrs: impl IntoIterator<Item = SocketAddr>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    for addr in addrs {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        if TcpStream::connect_timeout(&addr, remaining).is_ok() {
            return true;
        }
    }
    false
}
