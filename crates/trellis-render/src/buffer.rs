//! Pooled byte buffers for staging rendered output.
//!
//! A markup render executes into a [`PooledBuffer`] and only copies it to the
//! response once execution has succeeded. The guard hands the buffer back to
//! its [`BufferPool`] when dropped, so every exit path of a render releases it.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Buffers that grew past this capacity are freed instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 64 * 1024;

/// Number of idle buffers a pool retains by default.
pub const DEFAULT_POOL_SIZE: usize = 16;

/// A bounded free-list of byte buffers.
#[derive(Debug)]
pub struct BufferPool {
    free: Mutex<Vec<Vec<u8>>>,
    max_idle: usize,
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

impl BufferPool {
    /// Creates a pool that keeps at most `max_idle` idle buffers.
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::new()),
            max_idle,
        }
    }

    /// Takes an empty buffer from the pool, allocating one if none is idle.
    pub fn get(&self) -> PooledBuffer<'_> {
        let buf = self
            .free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        PooledBuffer { buf, pool: self }
    }

    /// Number of idle buffers currently held.
    pub fn idle(&self) -> usize {
        self.free
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn put(&self, mut buf: Vec<u8>) {
        if buf.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        buf.clear();
        let mut free = self.free.lock().unwrap_or_else(PoisonError::into_inner);
        if free.len() < self.max_idle {
            free.push(buf);
        }
    }
}

/// A buffer on loan from a [`BufferPool`].
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    buf: Vec<u8>,
    pool: &'a BufferPool,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.put(std::mem::take(&mut self.buf));
    }
}
