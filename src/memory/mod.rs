mod arena;
mod limiter;

pub use self::arena::Arena;
pub use self::limiter::{MemoryLimitExceededError, MemoryLimiter, SharedMemoryLimiter};
