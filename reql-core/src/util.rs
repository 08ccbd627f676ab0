use std::sync::{Mutex, MutexGuard};

/// Lock `mutex`, a panic in another holder does not invalidate the state it protects.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

