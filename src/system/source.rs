use super::process::{Connection, ConnectionError, RawProcess};

/// Access to the live process table.
///
/// `refresh` re-reads OS state; `processes` and `connections` answer from
/// what the last refresh saw, so one refresh gives a consistent snapshot.
pub trait ProcessSource {
    fn refresh(&mut self);
    fn processes(&self) -> Vec<RawProcess>;
    fn connections(&self, pid: u32) -> Result<Vec<Connection>, ConnectionError>;
}
