use super::{Connection, ConnectionError, SocketInspector};

pub struct Platform;

impl SocketInspector for Platform {
    fn empty() -> Self {
        Platform
    }

    fn load() -> Self {
        Platform
    }

    fn connections(&self, _pid: u32) -> Result<Vec<Connection>, ConnectionError> {
        // No per-process socket source wired up for this OS yet
        Err(ConnectionError::Unsupported)
    }
}
