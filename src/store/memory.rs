use std::cell::RefCell;
use std::rc::Rc;

use crate::store::schema::PersistedState;
use crate::store::{Changed, StateStore, StoreError};

/// In-process store. Clones share the same slot, so a caller can keep one
/// handle to inspect what a session saved through another.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Rc<RefCell<Slot>>,
}

#[derive(Debug, Default)]
struct Slot {
    state: PersistedState,
    saves: usize,
    last_changed: Changed,
}

impl MemoryStore {
    pub fn new(state: PersistedState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Slot {
                state,
                ..Slot::default()
            })),
        }
    }

    pub fn snapshot(&self) -> PersistedState {
        self.inner.borrow().state.clone()
    }

    pub fn save_count(&self) -> usize {
        self.inner.borrow().saves
    }

    /// Pieces named by the most recent save.
    pub fn last_changed(&self) -> Changed {
        self.inner.borrow().last_changed
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> PersistedState {
        self.snapshot()
    }

    fn save(&self, state: &PersistedState, changed: Changed) -> Result<(), StoreError> {
        let mut slot = self.inner.borrow_mut();
        slot.state = state.clone();
        slot.saves += 1;
        slot.last_changed = changed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let store = MemoryStore::default();
        let handle = store.clone();
        let mut state = PersistedState::default();
        state.active_line = 4;
        store.save(&state, Changed::CURSOR).unwrap();
        assert_eq!(handle.load().active_line, 4);
        assert_eq!(handle.save_count(), 1);
        assert_eq!(handle.last_changed(), Changed::CURSOR);
    }
}
