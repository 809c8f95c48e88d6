//! Last-request-wins scheduling for background route searches.
//!
//! Each owner (fleet or character) holds one [`RequestSlot`]. Issuing a new
//! search cancels the outstanding one and bumps a generation counter, so an
//! older search that finishes late can never publish over a newer result.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Cooperative cancellation flag checked at each candidate-expansion step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observers see it at their next check.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Ticket identifying one issued search for an owner.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    generation: u64,
    token: CancelToken,
}

impl SearchTicket {
    /// Token the search loop should poll.
    #[must_use]
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct SlotState {
    generation: u64,
    token: CancelToken,
}

/// Per-owner request slot enforcing the last-request-wins ordering.
#[derive(Debug)]
pub struct RequestSlot {
    state: Mutex<SlotState>,
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self {
            state: Mutex::new(SlotState {
                generation: 0,
                token: CancelToken::new(),
            }),
        }
    }
}

impl RequestSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        // A poisoned lock only means a panicked search thread; the slot state
        // itself stays consistent.
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Issue a new search, cancelling whatever was in flight.
    pub fn begin(&self) -> SearchTicket {
        let mut state = self.lock();
        state.token.cancel();
        state.generation += 1;
        state.token = CancelToken::new();
        SearchTicket {
            generation: state.generation,
            token: state.token.clone(),
        }
    }

    /// Cancel the in-flight search without issuing a replacement, e.g. on a
    /// region switch or snapshot change.
    pub fn invalidate(&self) {
        let mut state = self.lock();
        state.token.cancel();
        state.generation += 1;
    }

    /// Whether a ticket still belongs to the newest request.
    #[must_use]
    pub fn is_current(&self, ticket: &SearchTicket) -> bool {
        self.lock().generation == ticket.generation
    }

    /// Publish a finished search's result; stale results are discarded.
    #[must_use]
    pub fn publish<T>(&self, ticket: &SearchTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            log::debug!(
                "discarding stale search result (generation {})",
                ticket.generation
            );
            None
        }
    }
}

/// Run a search off the interactive path and resolve only if it is still the
/// newest request for this slot.
#[cfg(feature = "async")]
pub async fn spawn_search<T, F>(slot: Arc<RequestSlot>, search: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce(CancelToken) -> T + Send + 'static,
{
    let ticket = slot.begin();
    let token = ticket.token();
    match tokio::task::spawn_blocking(move || search(token)).await {
        Ok(result) => slot.publish(&ticket, result),
        Err(join_error) => {
            log::warn!("search task failed to join: {join_error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_cancels_the_previous_token() {
        let slot = RequestSlot::new();
        let first = slot.begin();
        assert!(!first.token().is_cancelled());
        let second = slot.begin();
        assert!(first.token().is_cancelled());
        assert!(!second.token().is_cancelled());
    }

    #[test]
    fn stale_ticket_never_publishes() {
        let slot = RequestSlot::new();
        let first = slot.begin();
        let second = slot.begin();
        assert_eq!(slot.publish(&first, "old"), None);
        assert_eq!(slot.publish(&second, "new"), Some("new"));
    }

    #[test]
    fn invalidate_cancels_without_a_replacement() {
        let slot = RequestSlot::new();
        let ticket = slot.begin();
        slot.invalidate();
        assert!(ticket.token().is_cancelled());
        assert_eq!(slot.publish(&ticket, 1), None);
    }

    #[cfg(feature = "async")]
    mod async_tests {
        use crate::dispatch::{RequestSlot, spawn_search};
        use std::sync::Arc;

        #[tokio::test(flavor = "multi_thread")]
        async fn newest_spawned_search_wins() {
            let slot = Arc::new(RequestSlot::new());
            let slow = spawn_search(Arc::clone(&slot), |token| {
                while !token.is_cancelled() {
                    std::thread::sleep(std::time::Duration::from_millis(1));
                }
                "slow"
            });
            let fast = spawn_search(Arc::clone(&slot), |_| "fast");
            let (slow_result, fast_result) = tokio::join!(slow, fast);
            assert_eq!(slow_result, None);
            assert_eq!(fast_result, Some("fast"));
        }
    }
}
