//! Bounded pool of reusable handles
//!
//! Capacity is fixed when the pool is built. Checkouts hand out a
//! [`Pooled`] guard with exclusive access to one handle; dropping the guard
//! returns the handle. A checkout that cannot be served either blocks
//! ([`ResourcePool::checkout`]) or fails ([`ResourcePool::try_checkout`],
//! [`ResourcePool::checkout_many`]); the pool never hands out more handles
//! than it was built with.

use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::HarnessError;

struct Shared<T> {
    capacity: usize,
    idle: Mutex<Vec<T>>,
    returned: Condvar,
}

pub struct ResourcePool<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for ResourcePool<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for ResourcePool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourcePool")
            .field("capacity", &self.shared.capacity)
            .field("idle", &self.idle())
            .finish()
    }
}

impl<T> ResourcePool<T> {
    /// Build a pool that owns exactly the given handles.
    pub fn new(handles: Vec<T>) -> Self {
        Self {
            shared: Arc::new(Shared {
                capacity: handles.len(),
                idle: Mutex::new(handles),
                returned: Condvar::new(),
            }),
        }
    }

    /// Build a pool of `capacity` handles from a fallible constructor.
    ///
    /// The constructor receives the handle index.
    pub fn with_factory<F>(capacity: usize, mut factory: F) -> anyhow::Result<Self>
    where
        F: FnMut(usize) -> anyhow::Result<T>,
    {
        let handles = (0..capacity).map(&mut factory).collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self::new(handles))
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    /// Handles currently available for checkout.
    pub fn idle(&self) -> usize {
        self.shared.idle.lock().len()
    }

    /// Handles currently checked out.
    pub fn in_use(&self) -> usize {
        self.capacity() - self.idle()
    }

    /// Take one handle, waiting for a return if none is idle.
    pub fn checkout(&self) -> Pooled<T> {
        let mut idle = self.shared.idle.lock();
        loop {
            if let Some(handle) = idle.pop() {
                return self.wrap(handle);
            }
            self.shared.returned.wait(&mut idle);
        }
    }

    /// Take one handle if one is idle.
    pub fn try_checkout(&self) -> Result<Pooled<T>, HarnessError> {
        self.shared
            .idle
            .lock()
            .pop()
            .map(|handle| self.wrap(handle))
            .ok_or(HarnessError::PoolExhausted {
                requested: 1,
                available: 0,
            })
    }

    /// Take `count` handles at once, or none.
    ///
    /// Asking for more than the capacity is a configuration error; asking
    /// for more than are idle right now is pool exhaustion.
    pub fn checkout_many(&self, count: usize) -> Result<Vec<Pooled<T>>, HarnessError> {
        if count > self.capacity() {
            return Err(HarnessError::WorkerCountExceedsCapacity {
                workers: count,
                capacity: self.capacity(),
            });
        }

        let mut idle = self.shared.idle.lock();
        if idle.len() < count {
            return Err(HarnessError::PoolExhausted {
                requested: count,
                available: idle.len(),
            });
        }
        let start = idle.len() - count;
        let taken: Vec<T> = idle.drain(start..).collect();
        drop(idle);

        Ok(taken.into_iter().map(|handle| self.wrap(handle)).collect())
    }

    fn wrap(&self, handle: T) -> Pooled<T> {
        Pooled {
            handle: Some(handle),
            shared: Arc::clone(&self.shared),
        }
    }
}

/// A checked-out handle; returned to its pool on drop
pub struct Pooled<T> {
    handle: Option<T>,
    shared: Arc<Shared<T>>,
}

impl<T> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match &self.handle {
            Some(handle) => handle,
            None => unreachable!("pooled handle is only taken on drop"),
        }
    }
}

impl<T> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        match &mut self.handle {
            Some(handle) => handle,
            None => unreachable!("pooled handle is only taken on drop"),
        }
    }
}

impl<T> Drop for Pooled<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.shared.idle.lock().push(handle);
            self.shared.returned.notify_one();
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pooled").field(&self.handle).finish()
    }
}
