use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lazily-populated table of per-collection write locks.
///
/// The table itself sits behind a short-lived mutex that is only held while
/// looking up or inserting an entry, never while a collection lock is being
/// waited on. Entries are never removed, so every caller asking for the same
/// name gets a clone of the same `Arc`.
#[derive(Default)]
pub struct LockTable {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl LockTable {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the lock for `collection`, creating it on first use.
    pub fn lock_for(&self, collection: &str) -> Arc<Mutex<()>> {
        // Poisoning cannot leave the map half-updated.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(collection) {
            return Arc::clone(lock);
        }
        let lock = Arc::new(Mutex::new(()));
        locks.insert(collection.to_string(), Arc::clone(&lock));
        lock
    }

    /// Number of collections that have been handed a lock.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no collection has been locked yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for LockTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockTable")
            .field("collections", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn same_name_returns_same_lock() {
        let table = LockTable::new();
        let a = table.lock_for("users");
        let b = table.lock_for("users");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn different_names_return_different_locks() {
        let table = LockTable::new();
        let a = table.lock_for("users");
        let b = table.lock_for("orders");
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn table_never_shrinks() {
        let table = LockTable::new();
        assert!(table.is_empty());
        {
            let _lock = table.lock_for("users");
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn racing_first_access_yields_one_lock() {
        let table = Arc::new(LockTable::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let table = Arc::clone(&table);
                thread::spawn(move || table.lock_for("fresh"))
            })
            .collect();

        let locks: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();

        for lock in &locks[1..] {
            assert!(Arc::ptr_eq(&locks[0], lock));
        }
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn held_lock_does_not_block_other_collections() {
        let table = Arc::new(LockTable::new());
        let users = table.lock_for("users");
        let _held = users.lock().unwrap();

        let (tx, rx) = mpsc::channel();
        let worker = {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let orders = table.lock_for("orders");
                let _guard = orders.lock().unwrap();
                tx.send(()).unwrap();
            })
        };

        rx.recv_timeout(Duration::from_secs(5))
            .expect("lock on another collection should not wait");
        worker.join().unwrap();
    }

    #[test]
    fn held_lock_blocks_same_collection() {
        let table = Arc::new(LockTable::new());
        let users = table.lock_for("users");
        let held = users.lock().unwrap();

        let (tx, rx) = mpsc::channel();
        let worker = {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                let users = table.lock_for("users");
                let _guard = users.lock().unwrap();
                tx.send(()).unwrap();
            })
        };

        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        drop(held);
        rx.recv_timeout(Duration::from_secs(5))
            .expect("lock should be granted after release");
        worker.join().unwrap();
    }
}
