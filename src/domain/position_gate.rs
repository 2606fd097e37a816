//! Position Gate
//!
//! Caps the number of simultaneously open long positions.
//!
//! A buy first reserves a slot, then either commits it once the exchange has
//! confirmed the order or drops the reservation, which hands the slot back.
//! Reserving checks capacity and claims the slot under the same lock, so two
//! concurrent buys can never both pass the check for the last free slot.
//!
//! The count lives in memory only and starts at zero on every process start.

use serde::{Deserialize, Serialize};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Default ceiling on concurrently open longs
pub const DEFAULT_MAX_OPEN_LONGS: u32 = 2;

#[derive(Debug, Default)]
struct GateState {
    open_longs: u32,
    /// Slots claimed by in-flight buys that have not been confirmed yet
    reserved: u32,
}

/// Point-in-time view of the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateSnapshot {
    pub open_longs: u32,
    pub pending: u32,
    pub max_open_longs: u32,
}

#[derive(Debug)]
pub struct PositionGate {
    max_open_longs: u32,
    state: Mutex<GateState>,
}

impl Default for PositionGate {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OPEN_LONGS)
    }
}

impl PositionGate {
    pub fn new(max_open_longs: u32) -> Self {
        Self {
            max_open_longs,
            state: Mutex::new(GateState::default()),
        }
    }

    // Critical sections never panic, so a poisoned lock still holds a valid count.
    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether a new long could be opened right now. Does not claim anything.
    pub fn has_capacity(&self) -> bool {
        let state = self.lock();
        state.open_longs + state.reserved < self.max_open_longs
    }

    /// Claim a slot for a new long, or `None` when the gate is full.
    pub fn try_reserve(&self) -> Option<LongReservation<'_>> {
        let mut state = self.lock();
        if state.open_longs + state.reserved >= self.max_open_longs {
            return None;
        }
        state.reserved += 1;
        Some(LongReservation {
            gate: self,
            committed: false,
        })
    }

    /// Mark one long as closed. Returns `false` if none was open.
    pub fn try_close_one(&self) -> bool {
        let mut state = self.lock();
        if state.open_longs == 0 {
            return false;
        }
        state.open_longs -= 1;
        true
    }

    pub fn open_longs(&self) -> u32 {
        self.lock().open_longs
    }

    pub fn max_open_longs(&self) -> u32 {
        self.max_open_longs
    }

    pub fn snapshot(&self) -> GateSnapshot {
        let state = self.lock();
        GateSnapshot {
            open_longs: state.open_longs,
            pending: state.reserved,
            max_open_longs: self.max_open_longs,
        }
    }
}

/// A claimed slot. Dropping it without [`commit_open`](Self::commit_open)
/// returns the slot to the gate.
#[derive(Debug)]
#[must_use = "dropping a reservation releases the slot immediately"]
pub struct LongReservation<'a> {
    gate: &'a PositionGate,
    committed: bool,
}

impl LongReservation<'_> {
    /// Turn the reservation into an open long. Returns the new open count.
    pub fn commit_open(mut self) -> u32 {
        let mut state = self.gate.lock();
        state.reserved -= 1;
        state.open_longs += 1;
        self.committed = true;
        state.open_longs
    }
}

impl Drop for LongReservation<'_> {
    fn drop(&mut self) {
        if !self.committed {
            let mut state = self.gate.lock();
            state.reserved -= 1;
        }
    }
}
