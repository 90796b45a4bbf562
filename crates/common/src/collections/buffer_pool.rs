//! Reusable byte buffers for payload serialization.
//!
//! [`BufferPool`] hands out [`BytesMut`] buffers and takes them back once the
//! caller is done, so steady-state flushes do not allocate.
//!
//! **Semantics**
//! - `acquire` never blocks and never fails: an empty pool allocates a fresh
//!   buffer.
//! - `release` clears the buffer before it is retained. Buffers that grew past
//!   twice the nominal capacity, or that arrive while the pool is full, are
//!   dropped instead.
//! - A buffer is owned by exactly one caller between `acquire` and `release`;
//!   the lock-free queue never yields the same buffer twice.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::BytesMut;
use crossbeam::queue::ArrayQueue;

/// Lock-free pool of serialization buffers.
#[derive(Debug)]
pub struct BufferPool {
    pool: ArrayQueue<BytesMut>,
    buffer_capacity: usize,
    reused: AtomicU64,
    allocated: AtomicU64,
}

/// Point-in-time counters for a [`BufferPool`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferPoolStats {
    /// Buffers currently idle in the pool
    pub available: usize,
    /// Acquisitions served from the pool
    pub reused: u64,
    /// Acquisitions that had to allocate
    pub allocated: u64,
}

impl BufferPool {
    /// Create a pool retaining up to `retained` buffers of `buffer_capacity`
    /// bytes each. The pool starts full.
    pub fn new(retained: usize, buffer_capacity: usize) -> Self {
        let pool = ArrayQueue::new(retained.max(1));
        for _ in 0..retained {
            let _ = pool.push(BytesMut::with_capacity(buffer_capacity));
        }
        Self {
            pool,
            buffer_capacity,
            reused: AtomicU64::new(0),
            allocated: AtomicU64::new(0),
        }
    }

    /// Take an empty buffer, allocating when the pool is exhausted.
    pub fn acquire(&self) -> BytesMut {
        match self.pool.pop() {
            Some(buf) => {
                self.reused.fetch_add(1, Ordering::Relaxed);
                buf
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                BytesMut::with_capacity(self.buffer_capacity)
            }
        }
    }

    /// Return a buffer. It is emptied before it can be handed out again.
    pub fn release(&self, mut buf: BytesMut) {
        buf.clear();
        if buf.capacity() <= self.buffer_capacity * 2 {
            let _ = self.pool.push(buf);
        }
    }

    /// Number of idle buffers.
    pub fn available(&self) -> usize {
        self.pool.len()
    }

    pub fn stats(&self) -> BufferPoolStats {
        BufferPoolStats {
            available: self.pool.len(),
            reused: self.reused.load(Ordering::Relaxed),
            allocated: self.allocated.load(Ordering::Relaxed),
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(4, 4096)
    }
}
