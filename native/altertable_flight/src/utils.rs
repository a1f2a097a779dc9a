/// Utility functions and helpers for altertable_flight
///
/// This module provides the locking helpers used around the shared transport
/// client slot.
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::AdapterError;

/// Safely lock an Arc<Mutex<T>> with proper error handling
///
/// Returns `LockPoisoned` naming the call site if a previous holder panicked.
pub fn safe_lock_arc<'a, T: ?Sized>(
    arc_mutex: &'a Arc<Mutex<T>>,
    context: &str,
) -> Result<MutexGuard<'a, T>, AdapterError> {
    arc_mutex
        .lock()
        .map_err(|e| AdapterError::LockPoisoned(format!("{context}: {e}")))
}
