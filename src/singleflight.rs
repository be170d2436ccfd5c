//! Duplicate-suppression for concurrent loads of the same key.
//!
//! Mirrors the original `singleflight.Group.Do`: for a given key, no matter
//! how many callers invoke [`SingleFlightGroup::call`] concurrently, the
//! supplied closure runs at most once. Callers that arrive while a call is
//! in flight block until it finishes and then receive the same result.
//!
//! `sync.WaitGroup` has no direct equivalent in `std`, so the "wait for the
//! in-flight call to finish" step is built from a [`parking_lot::Condvar`]
//! guarding a per-key in-flight flag.

use parking_lot::{Condvar, Mutex};
use std::collections::HashMap;
use std::sync::Arc;

struct Call<V, E> {
    done: Mutex<bool>,
    condvar: Condvar,
    result: Mutex<Option<Result<V, E>>>,
}

impl<V, E> Call<V, E> {
    fn new() -> Self {
        Call {
            done: Mutex::new(false),
            condvar: Condvar::new(),
            result: Mutex::new(None),
        }
    }

    fn wait(&self) -> Result<V, E>
    where
        V: Clone,
        E: Clone,
    {
        let mut done = self.done.lock();
        while !*done {
            self.condvar.wait(&mut done);
        }
        self.result
            .lock()
            .clone()
            .expect("result is set before done is marked true")
    }

    fn finish(&self, result: Result<V, E>)
    where
        V: Clone,
        E: Clone,
    {
        *self.result.lock() = Some(result);
        *self.done.lock() = true;
        self.condvar.notify_all();
    }
}

/// Coalesces concurrent loads for the same key into a single execution of
/// the loading closure.
pub struct SingleFlightGroup<V, E> {
    calls: Mutex<HashMap<String, Arc<Call<V, E>>>>,
}

impl<V, E> SingleFlightGroup<V, E>
where
    V: Clone,
    E: Clone,
{
    pub fn new() -> Self {
        SingleFlightGroup {
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Runs `f` for `key`, or waits for and returns the result of an
    /// already-in-flight call for the same key.
    ///
    /// `f` is never invoked while `self.calls` is locked, so it may itself
    /// call back into this group for a different key without deadlocking.
    pub fn call(&self, key: &str, f: impl FnOnce() -> Result<V, E>) -> Result<V, E> {
        let mut calls = self.calls.lock();
        if let Some(existing) = calls.get(key) {
            let existing = Arc::clone(existing);
            drop(calls);
            return existing.wait();
        }

        let call = Arc::new(Call::new());
        calls.insert(key.to_string(), Arc::clone(&call));
        drop(calls);

        let result = f();
        call.finish(result.clone());

        self.calls.lock().remove(key);
        result
    }
}

impl<V, E> Default for SingleFlightGroup<V, E>
where
    V: Clone,
    E: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, E> std::fmt::Debug for SingleFlightGroup<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingleFlightGroup")
            .field("in_flight", &self.calls.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn single_caller_gets_its_own_result() {
        let group: SingleFlightGroup<i32, String> = SingleFlightGroup::new();
        let result = group.call("k", || Ok(42));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn concurrent_callers_for_the_same_key_trigger_one_execution() {
        let group = Arc::new(SingleFlightGroup::<i32, String>::new());
        let call_count = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let group = Arc::clone(&group);
                let call_count = Arc::clone(&call_count);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    group.call("shared-key", || {
                        call_count.fetch_add(1, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(20));
                        Ok(7)
                    })
                })
            })
            .collect();

        for h in handles {
            assert_eq!(h.join().unwrap(), Ok(7));
        }
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn different_keys_run_independently() {
        let group: SingleFlightGroup<i32, String> = SingleFlightGroup::new();
        assert_eq!(group.call("a", || Ok(1)), Ok(1));
        assert_eq!(group.call("b", || Ok(2)), Ok(2));
    }

    #[test]
    fn all_waiters_receive_the_same_error() {
        let group = Arc::new(SingleFlightGroup::<i32, String>::new());
        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let group = Arc::clone(&group);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    group.call("failing-key", || {
                        thread::sleep(Duration::from_millis(10));
                        Err("boom".to_string())
                    })
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Err("boom".to_string()));
        }
    }

    #[test]
    fn key_can_be_called_again_after_completion() {
        let group: SingleFlightGroup<i32, String> = SingleFlightGroup::new();
        assert_eq!(group.call("k", || Ok(1)), Ok(1));
        assert_eq!(group.call("k", || Ok(2)), Ok(2));
    }
}
