//! Priority ordering of the registered protocols.
use core::cell::Cell;

use crate::protocol::Protocol;

/// Singly linked list of protocols, sorted by ascending priority value.
///
/// Links are indices into a fixed array, one slot per protocol. All links are `Cell`s so the
/// chain can be extended while an [`Iter`] over it is live, which happens when a handler invoked
/// during an idle broadcast registers another protocol.
pub(crate) struct PriorityChain {
    head: Cell<Option<Protocol>>,
    next: [Cell<Option<Protocol>>; Protocol::COUNT],
    linked: [Cell<bool>; Protocol::COUNT],
}

impl PriorityChain {
    pub(crate) const fn new() -> Self {
        Self {
            head: Cell::new(None),
            next: [const { Cell::new(None) }; Protocol::COUNT],
            linked: [const { Cell::new(false) }; Protocol::COUNT],
        }
    }

    pub(crate) fn head(&self) -> Option<Protocol> {
        self.head.get()
    }

    pub(crate) fn contains(&self, protocol: Protocol) -> bool {
        self.linked[protocol.index()].get()
    }

    /// Link `protocol` in front of the first node whose priority is not lower than `priority`.
    ///
    /// `priority_of` gives the priority of the protocols already linked.
    pub(crate) fn insert(&self, protocol: Protocol, priority: u8, priority_of: impl Fn(Protocol) -> u8) {
        if self.contains(protocol) {
            return;
        }
        self.linked[protocol.index()].set(true);

        let head = match self.head.get() {
            Some(head) if priority > priority_of(head) => head,
            head => {
                self.next[protocol.index()].set(head);
                self.head.set(Some(protocol));
                return;
            }
        };

        let mut current = head;
        loop {
            match self.next[current.index()].get() {
                Some(next) if priority > priority_of(next) => current = next,
                next => {
                    self.next[protocol.index()].set(next);
                    self.next[current.index()].set(Some(protocol));
                    return;
                }
            }
        }
    }

    /// Walk the chain from the highest to the lowest priority.
    pub(crate) fn iter(&self) -> Iter<'_> {
        Iter {
            chain: self,
            cursor: self.head(),
        }
    }
}

pub(crate) struct Iter<'a> {
    chain: &'a PriorityChain,
    cursor: Option<Protocol>,
}

impl Iterator for Iter<'_> {
    type Item = Protocol;

    fn next(&mut self) -> Option<Protocol> {
        let current = self.cursor?;
        self.cursor = self.chain.next[current.index()].get();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(Protocol::COUNT))
    }
}
