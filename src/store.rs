//! Group storage behind a trait seam, so the engine stays pure and the
//! backend can change without touching it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use crate::schemas::Group;

/// Repository for groups. Access goes through closures so implementations
/// control locking: `read`/`mutate` run the closure under the group's own
/// lock and return `None` for an unknown id.
pub trait GroupStore: Send + Sync + 'static {
    fn insert(&self, group: Group);

    fn read<R>(&self, id: &str, f: impl FnOnce(&Group) -> R) -> Option<R>;

    fn mutate<R>(&self, id: &str, f: impl FnOnce(&mut Group) -> R) -> Option<R>;
}

/// Process-lifetime storage. Groups are independent, so each gets its own
/// mutex; the outer map lock is held only long enough to look up or insert
/// a slot.
#[derive(Default)]
pub struct InMemoryStore {
    groups: RwLock<HashMap<String, Arc<Mutex<Group>>>>,
}

impl GroupStore for InMemoryStore {
    fn insert(&self, group: Group) {
        self.groups
            .write()
            .unwrap()
            .insert(group.id.clone(), Arc::new(Mutex::new(group)));
    }

    fn read<R>(&self, id: &str, f: impl FnOnce(&Group) -> R) -> Option<R> {
        let slot = self.groups.read().unwrap().get(id).cloned()?;
        let group = slot.lock().unwrap();
        Some(f(&group))
    }

    fn mutate<R>(&self, id: &str, f: impl FnOnce(&mut Group) -> R) -> Option<R> {
        let slot = self.groups.read().unwrap().get(id).cloned()?;
        let mut group = slot.lock().unwrap();
        Some(f(&mut group))
    }
}
