//! Exclusive lock used to serialize mode changes
//!
//! # Copyright
//! Copyright (C) 2020 QUARTIQ GmbH - All Rights Reserved
//! Unauthorized usage, editing, or copying is strictly prohibited.
//! Proprietary and confidential.
use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicBool, Ordering};

/// A lock that guarantees a single user of the contained value through an atomic flag.
///
/// # Note
/// Waiting users spin. The lock does not mask interrupts, so it must never be taken from a
/// context that may preempt the current holder.
pub(crate) struct AtomicLock<T> {
    value: UnsafeCell<T>,
    busy: AtomicBool,
}

/// Releases the lock when dropped, including on unwind.
struct Release<'a>(&'a AtomicBool);

impl Drop for Release<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<T> AtomicLock<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
            busy: AtomicBool::new(false),
        }
    }

    /// Run `f` with exclusive access to the value, waiting for any other user to finish.
    pub(crate) fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        while self
            .busy
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            core::hint::spin_loop();
        }

        let _release = Release(&self.busy);

        // The flag grants exclusive access until `_release` is dropped.
        f(unsafe { &mut *self.value.get() })
    }

    pub(crate) fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

// Access to the value is serialized by the atomic flag.
unsafe impl<T: Send> Sync for AtomicLock<T> {}
