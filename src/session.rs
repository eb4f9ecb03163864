//! Guards against stale aggregation results.
//!
//! A caller issues a ticket each time the pet or its weight changes and only
//! publishes a finished series if its ticket is still the newest one.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Clone, PartialEq)]
pub struct RequestTicket {
    generation: u64,
    pub pet_id: String,
    pub weight_kg: f64,
}

impl RequestTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Default)]
pub struct StatsRequests {
    latest: AtomicU64,
}

impl StatsRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, pet_id: &str, weight_kg: f64) -> RequestTicket {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        RequestTicket {
            generation,
            pet_id: pet_id.to_string(),
            weight_kg,
        }
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.generation
    }

    /// Hands `result` back only when no newer ticket has been issued.
    pub fn accept<T>(&self, ticket: &RequestTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            tracing::debug!(
                pet_id = %ticket.pet_id,
                generation = ticket.generation,
                "dropping stale stats result"
            );
            None
        }
    }
}
