use std::fmt;
use std::net::SocketAddr;
use std::ops::Deref;
use std::sync::Arc;

/// Identity of the transport connection a request arrived on.
///
/// Cheap to clone; the dispatcher passes it through to handlers untouched
/// and never inspects it, so handlers can reply on or track per-connection
/// state for the right peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionRef(Arc<ConnectionInfo>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConnectionInfo {
    /// Transport-assigned connection id.
    pub id: u64,
    pub local_addr: Option<SocketAddr>,
    pub remote_addr: Option<SocketAddr>,
}

impl ConnectionRef {
    pub fn new(id: u64, local_addr: Option<SocketAddr>, remote_addr: Option<SocketAddr>) -> Self {
        ConnectionRef(Arc::new(ConnectionInfo { id, local_addr, remote_addr }))
    }
}

impl Deref for ConnectionRef {
    type Target = ConnectionInfo;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for ConnectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}/{}",
            self.id,
            self.local_addr.map(|a| a.to_string()).unwrap_or_default(),
            self.remote_addr.map(|a| a.to_string()).unwrap_or_default(),
        )
    }
}
