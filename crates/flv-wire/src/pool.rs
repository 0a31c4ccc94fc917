use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Upper bound on idle buffers kept by a pool.
const MAX_POOLED: usize = 32;

/// Buffers that grew beyond this capacity are dropped instead of pooled.
/// Fixed-size FLV fields never need more than a few bytes.
const MAX_RETAINED_CAPACITY: usize = 64;

/// Shared pool of small scratch buffers for fixed-size field reads.
///
/// ```text
///   acquire() ──► ScratchBuffer (empty, exclusively owned)
///                      │
///                    drop
///                      │
///                      ▼
///               cleared and pushed back
/// ```
///
/// The pool is a reuse optimization only. Decoding is correct with an
/// empty pool; buffers are allocated on demand when none are idle.
/// The idle list is guarded by a mutex, so two concurrent `acquire`
/// calls can never receive the same buffer.
#[derive(Debug, Default)]
pub struct ScratchPool {
    idle: Mutex<Vec<Vec<u8>>>,
}

static GLOBAL: ScratchPool = ScratchPool::new();

/// The process-wide pool shared by every decoder.
#[must_use]
pub fn global() -> &'static ScratchPool {
    &GLOBAL
}

impl ScratchPool {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            idle: Mutex::new(Vec::new()),
        }
    }

    /// Take an empty buffer from the pool, allocating if none is idle.
    pub fn acquire(&self) -> ScratchBuffer<'_> {
        let buf = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        ScratchBuffer { buf, pool: self }
    }

    /// Number of idle buffers currently held.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn put_back(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        buf.clear();
        let mut idle = self.idle.lock().unwrap_or_else(PoisonError::into_inner);
        if idle.len() < MAX_POOLED {
            idle.push(buf);
        }
    }
}

/// A buffer borrowed from a [`ScratchPool`]. Returned to the pool on drop.
#[derive(Debug)]
pub struct ScratchBuffer<'p> {
    buf: Vec<u8>,
    pool: &'p ScratchPool,
}

impl Deref for ScratchBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for ScratchBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for ScratchBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put_back(std::mem::take(&mut self.buf));
    }
}
