//! Identity tracking for value sharing (tags 28 / 29).

use std::collections::HashMap;

use crate::value::Shared;

/// What the tracker knows about a [`Shared`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SharedState {
    /// Being encoded right now with sharing disabled.
    InProgress,
    /// Marked with tag 28 under this index.
    Indexed(u64),
}

/// Tracks shared handles and hands out sequential share indices.
///
/// Every handle seen is kept alive by the tracker, so an allocation address
/// can never be reused by an unrelated value while it is still recorded.
/// Owned containers consume an index too, since the decoder counts every
/// tag 28 it sees.
#[derive(Debug, Clone, Default)]
pub(crate) struct SharingTracker {
    entries: HashMap<usize, (Shared, SharedState)>,
    next_index: u64,
}

impl SharingTracker {
    pub fn state(&self, handle: &Shared) -> Option<SharedState> {
        self.entries.get(&handle.id()).map(|(_, state)| *state)
    }

    /// Reserves the next index for an anonymous container.
    pub fn next_index(&mut self) -> u64 {
        let index = self.next_index;
        self.next_index += 1;
        index
    }

    /// Records `handle` as shared and returns its index.
    pub fn mark(&mut self, handle: &Shared) -> u64 {
        let index = self.next_index();
        self.entries
            .insert(handle.id(), (handle.clone(), SharedState::Indexed(index)));
        index
    }

    pub fn enter(&mut self, handle: &Shared) {
        self.entries
            .insert(handle.id(), (handle.clone(), SharedState::InProgress));
    }

    pub fn leave(&mut self, handle: &Shared) {
        self.entries.remove(&handle.id());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_index = 0;
    }
}
