use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use super::platform::SocketTable;
use super::process::{Connection, ConnectionError, RawProcess};
use super::source::ProcessSource;

/// `ProcessSource` backed by sysinfo for enumeration and the platform
/// socket tables for connections.
pub struct SystemSource {
    sys: System,
    sockets: SocketTable,
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSource {
    /// Starts empty; the first `refresh` does the first scan.
    pub fn new() -> Self {
        SystemSource {
            sys: System::new(),
            sockets: SocketTable::empty(),
        }
    }
}

impl ProcessSource for SystemSource {
    fn refresh(&mut self) {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();

        self.sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::OnlyIfNotSet),
        );
        self.sockets = SocketTable::load();
    }

    fn processes(&self) -> Vec<RawProcess> {
        let mut processes: Vec<RawProcess> = self
            .sys
            .processes()
            .iter()
            .map(|(pid, process)| {
                let argv: Vec<String> = process
                    .cmd()
                    .iter()
                    .map(|s| s.to_string_lossy().to_string())
                    .collect();
                RawProcess {
                    pid: pid.as_u32(),
                    // Kernel threads and processes we may not inspect have no argv
                    command: if argv.is_empty() { None } else { Some(argv) },
                    created_at: process.start_time(),
                }
            })
            .collect();

        // sysinfo hands back a hash map; pid order keeps rows stable between refreshes
        processes.sort_by_key(|p| p.pid);
        processes
    }

    fn connections(&self, pid: u32) -> Result<Vec<Connection>, ConnectionError> {
        self.sockets.connections(pid)
    }
}
