//! Serialization of asynchronous imports: [`ImportGate`].
//!
//! Reading a map file happens off the update loop. The gate admits one
//! import at a time: [`begin`](ImportGate::begin) hands out a ticket or
//! refuses while another import is pending, and only the holder of the
//! current ticket may [`finish`](ImportGate::finish). A completion carrying
//! a stale ticket is dropped, so the grid only ever reflects the latest
//! admitted import.

use crate::error::{MapError, Result};

/// Identifies one admitted import.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImportTicket(u64);

/// Admits at most one in-flight import.
#[derive(Debug, Default)]
pub struct ImportGate {
    issued: u64,
    pending: Option<ImportTicket>,
}

impl ImportGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an import is in flight.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Admit a new import, or fail with [`MapError::ImportInProgress`].
    pub fn begin(&mut self) -> Result<ImportTicket> {
        if self.pending.is_some() {
            return Err(MapError::ImportInProgress);
        }
        self.issued += 1;
        let ticket = ImportTicket(self.issued);
        self.pending = Some(ticket);
        log::debug!("import {} admitted", ticket.0);
        Ok(ticket)
    }

    /// Close the import identified by `ticket`. Returns `true` when the
    /// caller should apply its result, `false` for a stale or unknown
    /// ticket.
    pub fn finish(&mut self, ticket: ImportTicket) -> bool {
        if self.pending == Some(ticket) {
            self.pending = None;
            true
        } else {
            log::debug!("dropping stale import {}", ticket.0);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_import_at_a_time() {
        let mut gate = ImportGate::new();
        let t1 = gate.begin().unwrap();
        assert!(gate.is_pending());
        assert!(matches!(gate.begin(), Err(MapError::ImportInProgress)));
        assert!(gate.finish(t1));
        assert!(!gate.is_pending());
        let t2 = gate.begin().unwrap();
        assert_ne!(t1, t2);
    }

    #[test]
    fn stale_completion_is_dropped() {
        let mut gate = ImportGate::new();
        let t1 = gate.begin().unwrap();
        assert!(gate.finish(t1));
        let t2 = gate.begin().unwrap();
        assert!(!gate.finish(t1));
        assert!(gate.is_pending());
        assert!(gate.finish(t2));
        assert!(!gate.finish(t2));
    }
}
