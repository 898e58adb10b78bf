//! Watchpoint pool.
//!
//! A fixed number of slots threaded onto two singly linked lists: free slots
//! and slots in use. Allocation pops the head of the free list and pushes it
//! onto the in-use list.

use thiserror::Error;

/// Number of watchpoint slots.
pub const NR_WP: usize = 32;

/// One watchpoint slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchpoint {
    /// Slot number.
    pub no: usize,
    /// Expression being watched. Empty while the slot is free.
    pub expr: String,
    next: Option<usize>,
}

/// The pool.
#[derive(Debug, Clone)]
pub struct WatchpointPool {
    slots: Vec<Watchpoint>,
    free: Option<usize>,
    head: Option<usize>,
}

impl WatchpointPool {
    /// Create a pool with `capacity` free slots.
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity)
            .map(|no| Watchpoint {
                no,
                expr: String::new(),
                next: (no + 1 < capacity).then_some(no + 1),
            })
            .collect();
        Self {
            slots,
            free: (capacity > 0).then_some(0),
            head: None,
        }
    }

    /// Take a free slot for `expr`.
    pub fn alloc(&mut self, expr: impl Into<String>) -> Result<usize, WatchpointError> {
        let no = self.free.ok_or(WatchpointError::Exhausted(self.slots.len()))?;
        let slot = &mut self.slots[no];
        self.free = slot.next;
        slot.next = self.head;
        slot.expr = expr.into();
        self.head = Some(no);
        Ok(no)
    }

    /// Return slot `no` to the free list.
    pub fn free(&mut self, no: usize) -> Result<(), WatchpointError> {
        // unlink from the in-use list
        let mut link = self.head;
        let mut prev: Option<usize> = None;
        while let Some(cur) = link {
            if cur == no {
                break;
            }
            prev = Some(cur);
            link = self.slots[cur].next;
        }
        if link != Some(no) {
            return Err(WatchpointError::NotInUse(no));
        }

        let next = self.slots[no].next;
        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }

        let slot = &mut self.slots[no];
        slot.expr.clear();
        slot.next = self.free;
        self.free = Some(no);
        Ok(())
    }

    /// Watchpoints in use, most recently allocated first.
    pub fn active(&self) -> impl Iterator<Item = &Watchpoint> + '_ {
        std::iter::successors(self.head.map(|i| &self.slots[i]), move |wp| {
            wp.next.map(|i| &self.slots[i])
        })
    }

    /// Number of free slots.
    pub fn free_count(&self) -> usize {
        std::iter::successors(self.free, |&i| self.slots[i].next).count()
    }
}

/// Errors from the watchpoint pool.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchpointError {
    #[error("all {0} watchpoints are in use")]
    Exhausted(usize),

    #[error("watchpoint {0} is not in use")]
    NotInUse(usize),
}
