use super::process::{Connection, ConnectionError};

/// Per-process socket lookup backed by one read of the system socket tables.
pub trait SocketInspector: Sized {
    /// A table with no sockets, before the first load.
    fn empty() -> Self;
    fn load() -> Self;
    fn connections(&self, pid: u32) -> Result<Vec<Connection>, ConnectionError>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod unsupported;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use unsupported as platform_impl;

pub struct SocketTable(platform_impl::Platform);

impl SocketTable {
    pub fn empty() -> Self {
        SocketTable(platform_impl::Platform::empty())
    }

    pub fn load() -> Self {
        SocketTable(platform_impl::Platform::load())
    }

    pub fn connections(&self, pid: u32) -> Result<Vec<Connection>, ConnectionError> {
        self.0.connections(pid)
    }
}
