use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic request counter; only the most recently issued ticket is current.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    latest: AtomicU64,
}

/// A request's place in the issue order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the latest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    pub fn latest(&self) -> Ticket {
        Ticket(self.latest.load(Ordering::Acquire))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/generation.rs"]
mod tests;
