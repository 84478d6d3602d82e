use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;

use procfs::ProcError;
use procfs::net::{TcpState, UdpState};
use procfs::process::{FDTarget, Process};

use super::{Connection, ConnectionError, SocketInspector};

/// Socket inode -> connection, built from /proc/net/{tcp,tcp6,udp,udp6}.
pub struct Platform {
    by_inode: HashMap<u64, Connection>,
}

impl SocketInspector for Platform {
    fn empty() -> Self {
        Platform {
            by_inode: HashMap::new(),
        }
    }

    fn load() -> Self {
        let mut by_inode = HashMap::new();

        for (table, entries) in [("tcp", procfs::net::tcp()), ("tcp6", procfs::net::tcp6())] {
            match entries {
                Ok(entries) => {
                    for entry in entries {
                        let conn = Connection {
                            local: Some(entry.local_address),
                            remote: peer(entry.remote_address),
                            status: tcp_status(&entry.state).to_string(),
                        };
                        by_inode.insert(entry.inode, conn);
                    }
                }
                Err(err) => tracing::debug!(table, %err, "socket table unreadable"),
            }
        }

        for (table, entries) in [("udp", procfs::net::udp()), ("udp6", procfs::net::udp6())] {
            match entries {
                Ok(entries) => {
                    for entry in entries {
                        let conn = Connection {
                            local: Some(entry.local_address),
                            remote: peer(entry.remote_address),
                            status: udp_status(&entry.state).to_string(),
                        };
                        by_inode.insert(entry.inode, conn);
                    }
                }
                Err(err) => tracing::debug!(table, %err, "socket table unreadable"),
            }
        }

        Platform { by_inode }
    }

    fn connections(&self, pid: u32) -> Result<Vec<Connection>, ConnectionError> {
        let pid = i32::try_from(pid).map_err(|_| ConnectionError::ProcessGone)?;
        let process = Process::new(pid).map_err(classify)?;
        let fds = process.fd().map_err(classify)?;

        // A socket shared by several fds (dup, inherited) is one connection
        let mut seen = HashSet::new();
        let mut connections = Vec::new();
        for fd in fds {
            // An fd closed between readdir and readlink is not an error for the process
            let Ok(fd) = fd else { continue };
            if let FDTarget::Socket(inode) = fd.target
                && seen.insert(inode)
                && let Some(conn) = self.by_inode.get(&inode)
            {
                connections.push(conn.clone());
            }
        }
        Ok(connections)
    }
}

fn classify(err: ProcError) -> ConnectionError {
    match err {
        ProcError::PermissionDenied(_) => ConnectionError::PermissionDenied,
        ProcError::NotFound(_) => ConnectionError::ProcessGone,
        other => ConnectionError::Other(other.to_string()),
    }
}

/// Unconnected sockets report the wildcard address with port 0 as their peer.
fn peer(addr: SocketAddr) -> Option<SocketAddr> {
    if addr.ip().is_unspecified() && addr.port() == 0 {
        None
    } else {
        Some(addr)
    }
}

fn tcp_status(state: &TcpState) -> &'static str {
    match state {
        TcpState::Established => "ESTABLISHED",
        TcpState::SynSent => "SYN_SENT",
        TcpState::SynRecv => "SYN_RECV",
        TcpState::FinWait1 => "FIN_WAIT1",
        TcpState::FinWait2 => "FIN_WAIT2",
        TcpState::TimeWait => "TIME_WAIT",
        TcpState::Close => "CLOSE",
        TcpState::CloseWait => "CLOSE_WAIT",
        TcpState::LastAck => "LAST_ACK",
        TcpState::Listen => "LISTEN",
        TcpState::Closing => "CLOSING",
        _ => "UNKNOWN",
    }
}

fn udp_status(state: &UdpState) -> &'static str {
    match state {
        UdpState::Established => "ESTABLISHED",
        _ => "NONE",
    }
}
