//! Tests for utils.rs - Lock helpers

// Allow unwrap() in tests for cleaner test code
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::AdapterError;
use crate::utils::safe_lock_arc;

#[test]
fn test_safe_lock_arc_success() {
    let shared = Arc::new(Mutex::new(1));

    *safe_lock_arc(&shared, "increment").unwrap() += 1;

    assert_eq!(*shared.lock().unwrap(), 2);
}

#[test]
fn test_safe_lock_arc_poisoned() {
    let shared = Arc::new(Mutex::new(0));
    let handle = shared.clone();

    let _ = thread::spawn(move || {
        let _guard = handle.lock().unwrap();
        panic!("poison the lock");
    })
    .join();

    match safe_lock_arc(&shared, "after panic") {
        Err(AdapterError::LockPoisoned(msg)) => assert!(msg.starts_with("after panic")),
        other => panic!("Expected LockPoisoned, got {:?}", other.map(|g| *g)),
    };
}
