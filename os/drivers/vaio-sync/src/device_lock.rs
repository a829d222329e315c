use core::{
    cell::UnsafeCell,
    hint::spin_loop,
    ops::{Deref, DerefMut},
    sync::atomic::{AtomicBool, Ordering},
};

/// Coarse mutual exclusion around one device instance.
///
/// `Send` follows from the fields; sharing needs the impl below.
pub struct DeviceLock<T> {
    /// * `false`: no firmware transaction in flight
    /// * `true`: held by exactly one caller
    held: AtomicBool,
    state: UnsafeCell<T>,
}

// Safety: mutual exclusion; only T: Send may cross threads.
unsafe impl<T: Send> Sync for DeviceLock<T> {}

impl<T> DeviceLock<T> {
    pub const fn new(state: T) -> Self {
        Self {
            held: AtomicBool::new(false),
            state: UnsafeCell::new(state),
        }
    }

    /// Spin until no other transaction is in flight.
    #[inline]
    pub fn lock(&self) -> DeviceGuard<'_, T> {
        while self
            .held
            .compare_exchange_weak(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
        DeviceGuard { lock: self }
    }

    /// Run `f` with the device state locked.
    ///
    /// The guard is dropped before the return value is handed back, so
    /// callers can forward results to observers without holding the lock.
    #[inline]
    pub fn with_lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut g = self.lock();
        f(&mut g)
    }

    /// Whether a transaction is in flight.
    #[inline]
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Relaxed)
    }

    /// Consume the lock on detach and hand back the device state.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.state.into_inner()
    }
}

pub struct DeviceGuard<'a, T> {
    lock: &'a DeviceLock<T>,
}

impl<T> Deref for DeviceGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        unsafe { &*self.lock.state.get() }
    }
}

impl<T> DerefMut for DeviceGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        unsafe { &mut *self.lock.state.get() }
    }
}

impl<T> Drop for DeviceGuard<'_, T> {
    fn drop(&mut self) {
        // Release publishes the critical section.
        self.lock.held.store(false, Ordering::Release);
    }
}
