//! The shared channel pool of the base station
//!
//! A fixed number of interchangeable channels is granted to requests in
//! priority order, FIFO within equal priority. Grants happen in exactly two
//! places: synchronously at request time while capacity remains, and
//! synchronously inside [`ChannelPool::release`] when a channel frees up —
//! the freed channel goes to the frontmost waiting request in the same event
//! step, before any other event at the same virtual time is processed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::call::CallId;

/// Admission priority of a channel request. Lower values are served first.
///
/// The numeric tags follow the paper's convention: 0 for priority-1
/// handoffs, 1 for priority-2 handoffs, 3 for new calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    /// Priority-1 handoff call (most urgent)
    Handoff1,
    /// Priority-2 handoff call
    Handoff2,
    /// New call (no queueing right at all)
    New,
}

impl Priority {
    /// Numeric tag as used in the published model.
    pub fn tag(self) -> u8 {
        match self {
            Priority::Handoff1 => 0,
            Priority::Handoff2 => 1,
            Priority::New => 3,
        }
    }
}

/// Unique identifier of a channel request, assigned in request order.
///
/// The id doubles as the FIFO sequence inside a priority class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request({})", self.0)
    }
}

/// Result of asking the pool for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// A channel was free; the request holds it now.
    Granted(RequestId),
    /// All channels busy; the request is pending in the waiting list.
    Queued(RequestId),
}

/// A channel handed to a waiting request by [`ChannelPool::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub request: RequestId,
    pub call: CallId,
}

#[derive(Debug)]
struct PendingRequest {
    id: RequestId,
    call: CallId,
    priority: Priority,
}

/// Fixed-capacity pool of identical channels with a priority-ordered
/// waiting list.
///
/// The pool is the only shared mutable resource of a run. It is mutated
/// exclusively through [`request`], [`release`], and [`withdraw`], each of
/// which completes atomically with respect to the single-threaded event
/// loop. Invariant: `in_use <= capacity` at all times.
///
/// [`request`]: ChannelPool::request
/// [`release`]: ChannelPool::release
/// [`withdraw`]: ChannelPool::withdraw
#[derive(Debug)]
pub struct ChannelPool {
    capacity: usize,
    in_use: usize,
    /// Pending requests, ordered by priority then request id.
    waiting: Vec<PendingRequest>,
    /// Requests currently holding a channel.
    held: HashMap<RequestId, CallId>,
    next_request_id: u64,
}

impl ChannelPool {
    /// Create a pool with `capacity` channels. A capacity of zero is legal:
    /// every request queues and none is ever granted.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            in_use: 0,
            waiting: Vec::new(),
            held: HashMap::new(),
            next_request_id: 0,
        }
    }

    /// Ask for a channel on behalf of `call`.
    ///
    /// Grants immediately while a channel is free; otherwise the request
    /// joins the waiting list at its priority rank (stable FIFO among equal
    /// priorities).
    pub fn request(&mut self, call: CallId, priority: Priority) -> RequestOutcome {
        self.next_request_id += 1;
        let id = RequestId(self.next_request_id);

        if self.in_use < self.capacity {
            self.in_use += 1;
            self.held.insert(id, call);
            self.check_capacity();
            RequestOutcome::Granted(id)
        } else {
            let at = self.waiting.partition_point(|p| p.priority <= priority);
            self.waiting.insert(at, PendingRequest { id, call, priority });
            RequestOutcome::Queued(id)
        }
    }

    /// Return a held channel to the pool.
    ///
    /// If the waiting list is non-empty, the frontmost pending request
    /// becomes the next holder of the freed channel; the returned [`Grant`]
    /// names the call to resume in the same event step.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not hold a channel — releasing a request that was
    /// never granted (or releasing it twice) is a programming defect that
    /// would corrupt the statistics.
    pub fn release(&mut self, id: RequestId) -> Option<Grant> {
        assert!(
            self.held.remove(&id).is_some(),
            "released {id} which does not hold a channel"
        );
        self.in_use -= 1;

        if self.waiting.is_empty() {
            return None;
        }
        let next = self.waiting.remove(0);
        self.in_use += 1;
        self.held.insert(next.id, next.call);
        self.check_capacity();
        Some(Grant {
            request: next.id,
            call: next.call,
        })
    }

    /// Remove a still-pending request from the waiting list without
    /// granting it. Returns `false` (no-op) if the request was already
    /// granted or already removed.
    pub fn withdraw(&mut self, id: RequestId) -> bool {
        match self.waiting.iter().position(|p| p.id == id) {
            Some(at) => {
                self.waiting.remove(at);
                true
            }
            None => false,
        }
    }

    /// Number of pending (not yet granted) requests at the given priority.
    pub fn queue_depth(&self, priority: Priority) -> usize {
        self.waiting.iter().filter(|p| p.priority == priority).count()
    }

    /// Number of channels in the pool.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of channels currently held.
    pub fn in_use(&self) -> usize {
        self.in_use
    }

    /// Total number of pending requests across all priorities.
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    fn check_capacity(&self) {
        assert!(
            self.in_use <= self.capacity,
            "channel pool over capacity: {} in use, {} channels",
            self.in_use,
            self.capacity
        );
    }
}
