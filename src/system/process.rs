use std::fmt;
use std::net::SocketAddr;

/// One socket owned by a process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub local: Option<SocketAddr>,
    /// `None` for sockets that are not connected to a peer.
    pub remote: Option<SocketAddr>,
    pub status: String,
}

/// Why a process's connections could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionError {
    PermissionDenied,
    ProcessGone,
    Unsupported,
    Other(String),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::PermissionDenied => write!(f, "permission denied"),
            ConnectionError::ProcessGone => write!(f, "process exited"),
            ConnectionError::Unsupported => write!(f, "not supported on this platform"),
            ConnectionError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConnectionError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Connections {
    Listed(Vec<Connection>),
    Unavailable(ConnectionError),
}

impl Connections {
    pub fn unavailable_reason(&self) -> Option<&ConnectionError> {
        match self {
            Connections::Listed(_) => None,
            Connections::Unavailable(err) => Some(err),
        }
    }
}

impl From<Result<Vec<Connection>, ConnectionError>> for Connections {
    fn from(result: Result<Vec<Connection>, ConnectionError>) -> Self {
        match result {
            Ok(list) => Connections::Listed(list),
            Err(err) => Connections::Unavailable(err),
        }
    }
}

/// What the enumeration step reports for a process, before sockets are read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawProcess {
    pub pid: u32,
    pub command: Option<Vec<String>>,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub command: Option<Vec<String>>,
    pub created_at: u64,
    pub connections: Connections,
}

impl ProcessRecord {
    pub fn from_raw(raw: RawProcess, connections: Connections) -> Self {
        ProcessRecord {
            pid: raw.pid,
            command: raw.command,
            created_at: raw.created_at,
            connections,
        }
    }

    pub fn command_line(&self) -> Option<String> {
        self.command.as_ref().map(|argv| argv.join(" "))
    }
}
