//! Last-writer-wins gate for overlapping list fetches.

use std::sync::{Mutex, PoisonError};

use tokio_util::sync::CancellationToken;

/// Handle for one fetch attempt.
#[derive(Debug, Clone)]
pub struct FetchTicket {
    generation: u64,
    cancel: CancellationToken,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Fires when the ticket is superseded or the gate is torn down.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[derive(Debug, Default)]
struct GateState {
    generation: u64,
    current: Option<CancellationToken>,
}

#[derive(Debug, Default)]
pub struct RequestGate {
    state: Mutex<GateState>,
}

impl RequestGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, cancelling the previous one.
    pub fn begin_fetch(&self) -> FetchTicket {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = state.current.take() {
            previous.cancel();
        }
        state.generation += 1;
        let cancel = CancellationToken::new();
        state.current = Some(cancel.clone());
        FetchTicket {
            generation: state.generation,
            cancel,
        }
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation == ticket.generation && !ticket.cancel.is_cancelled()
    }

    /// Abort the outstanding fetch; no ticket is current afterwards.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = state.current.take() {
            current.cancel();
        }
        state.generation += 1;
    }
}
