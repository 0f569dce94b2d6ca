use super::{MemoryLimitExceededError, SharedMemoryLimiter};

/// Holds the bytes of the lexical unit that was left incomplete at the end of
/// a write, so it can be parsed again once the rest of it arrives.
///
/// Every byte of the pool above the preallocated size is requested from the
/// memory limiter.
#[derive(Debug)]
pub struct Arena {
    limiter: SharedMemoryLimiter,
    pool: Vec<u8>,
    len: usize,
}

impl Arena {
    pub fn new(limiter: SharedMemoryLimiter, preallocated_size: usize) -> Self {
        limiter.borrow_mut().preallocate(preallocated_size);

        Arena {
            limiter,
            pool: vec![0; preallocated_size],
            len: 0,
        }
    }

    fn reserve_up_to(&mut self, size: usize) -> Result<(), MemoryLimitExceededError> {
        if let Some(additional) = size.checked_sub(self.pool.len()).filter(|&a| a > 0) {
            self.limiter.borrow_mut().increase_usage(additional)?;
            self.pool.resize(size, 0);
        }

        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Adds the bytes of the next write to the carried bytes.
    pub fn push(&mut self, bytes: &[u8]) -> Result<(), MemoryLimitExceededError> {
        let end = self.len + bytes.len();

        self.reserve_up_to(end)?;
        self.pool[self.len..end].copy_from_slice(bytes);
        self.len = end;

        Ok(())
    }

    /// Drops everything, but the `count` trailing bytes.
    pub fn keep_last(&mut self, count: usize) {
        debug_assert!(count <= self.len);

        self.pool.copy_within(self.len - count..self.len, 0);
        self.len = count;
    }

    pub fn replace_with(&mut self, bytes: &[u8]) -> Result<(), MemoryLimitExceededError> {
        self.len = 0;

        self.push(bytes)
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.pool[..self.len]
    }
}

impl Drop for Arena {
    fn drop(&mut self) {
        self.limiter.borrow_mut().decrease_usage(self.pool.len());
    }
}

#[cfg(test)]
mod tests {
    use super::super::MemoryLimiter;
    use super::*;
    use std::rc::Rc;

    #[test]
    fn growth_is_accounted() {
        let limiter = MemoryLimiter::new_shared(10);
        let mut arena = Arena::new(Rc::clone(&limiter), 3);

        arena.push(b"ab").unwrap();
        assert_eq!(arena.bytes(), b"ab");
        assert_eq!(limiter.borrow().current_usage(), 3);

        arena.push(b"cd").unwrap();
        assert_eq!(arena.bytes(), b"abcd");
        assert_eq!(limiter.borrow().current_usage(), 4);

        arena.push(b"efghij").unwrap();
        assert_eq!(arena.bytes(), b"abcdefghij");
        assert_eq!(limiter.borrow().current_usage(), 10);

        assert_eq!(arena.push(b"k").unwrap_err(), MemoryLimitExceededError);
    }

    #[test]
    fn pool_is_reused() {
        let limiter = MemoryLimiter::new_shared(6);
        let mut arena = Arena::new(Rc::clone(&limiter), 0);

        arena.replace_with(b"<di").unwrap();
        assert_eq!(limiter.borrow().current_usage(), 3);

        arena.replace_with(b"<!--").unwrap();
        assert_eq!(arena.bytes(), b"<!--");
        assert_eq!(limiter.borrow().current_usage(), 4);

        arena.clear();
        assert!(arena.is_empty());

        arena.replace_with(b"</p").unwrap();
        assert_eq!(arena.bytes(), b"</p");
        assert_eq!(limiter.borrow().current_usage(), 4);
    }

    #[test]
    fn keep_last() {
        let limiter = MemoryLimiter::new_shared(10);
        let mut arena = Arena::new(Rc::clone(&limiter), 0);

        arena.push(b"x</a").unwrap();
        arena.keep_last(3);
        assert_eq!(arena.bytes(), b"</a");

        arena.push(b"b").unwrap();
        assert_eq!(arena.bytes(), b"</ab");
        assert_eq!(limiter.borrow().current_usage(), 4);

        arena.keep_last(0);
        assert!(arena.is_empty());
        assert_eq!(limiter.borrow().current_usage(), 4);
    }

    #[test]
    fn releases_memory_on_drop() {
        let limiter = MemoryLimiter::new_shared(10);

        {
            let mut arena = Arena::new(Rc::clone(&limiter), 2);

            arena.push(b"<div").unwrap();
            assert_eq!(limiter.borrow().current_usage(), 4);
        }

        assert_eq!(limiter.borrow().current_usage(), 0);
    }
}
