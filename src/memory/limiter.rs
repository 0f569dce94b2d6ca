use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

pub type SharedMemoryLimiter = Rc<RefCell<MemoryLimiter>>;

/// An error that occurs when the rewriter needs to buffer more data than
/// [`MemorySettings::max_allowed_memory_usage`] allows.
///
/// [`MemorySettings::max_allowed_memory_usage`]: ../struct.MemorySettings.html#structfield.max_allowed_memory_usage
#[derive(Error, Debug, Eq, PartialEq, Copy, Clone)]
#[error("The memory limit has been exceeded.")]
pub struct MemoryLimitExceededError;

/// Tracks the memory used by the buffers of a single rewriter.
#[derive(Debug)]
pub struct MemoryLimiter {
    used: usize,
    limit: usize,
}

impl MemoryLimiter {
    #[must_use]
    pub fn new_shared(limit: usize) -> SharedMemoryLimiter {
        Rc::new(RefCell::new(MemoryLimiter { used: 0, limit }))
    }

    #[cfg(test)]
    pub fn current_usage(&self) -> usize {
        self.used
    }

    /// Requests `byte_count` more bytes. The usage is left intact if the
    /// request is refused.
    #[inline]
    pub fn increase_usage(&mut self, byte_count: usize) -> Result<(), MemoryLimitExceededError> {
        match self.used.checked_add(byte_count) {
            Some(used) if used <= self.limit => {
                self.used = used;

                Ok(())
            }
            _ => Err(MemoryLimitExceededError),
        }
    }

    /// Accounts for memory that is allocated upfront, regardless of the limit.
    #[inline]
    pub fn preallocate(&mut self, byte_count: usize) {
        self.used = self.used.saturating_add(byte_count);
    }

    #[inline]
    pub fn decrease_usage(&mut self, byte_count: usize) {
        self.used = self.used.saturating_sub(byte_count);
    }
}
